// [libs/domain/payments/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TOLLGATE DOMAIN PAYMENTS (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L5)
 * RESPONSABILIDAD: PAYMENT BUILDER
 * =================================================================
 */

pub mod builder;

pub use builder::{PaymentBuilder, UnsignedPaymentPayload};
