// [libs/domain/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DOMAIN MODELS (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L2)
 * RESPONSABILIDAD: SINGLE SOURCE OF TRUTH PARA EL NÚCLEO DE CRÉDITOS
 *
 * Define las entidades (Account, CreditBalance, Payment, LedgerEntry), la
 * configuración de tarifas y la taxonomía de errores compartidas por todas
 * las demás librerías del workspace Tollgate.
 * =================================================================
 */

pub mod account;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod payment;
pub mod pricing_config;

pub use account::{Account, AccountStatus, CreditBalance};
pub use config::CoreConfig;
pub use errors::CoreError;
pub use ledger::{LedgerEntry, LedgerEntryKind};
pub use payment::{Payment, PaymentStatus};
pub use pricing_config::{
    LoyaltyTier, OperationCost, OperationCostOptions, PricingConfig, PurchaseTier,
};
