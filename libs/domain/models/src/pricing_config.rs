// [libs/domain/models/src/pricing_config.rs]
/*!
 * APARATO: PRICING CONFIGURATION & OPERATION COST CATALOG (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN ESTÁTICA DE TARIFAS Y MODIFICADORES
 *
 * Módulo estático consumido en modo solo-lectura por el Motor de Precios
 * (`tollgate-core-pricing`). No contiene lógica; sólo los datos de tarifa.
 */

use serde::{Deserialize, Serialize};

/// Un tramo de la tabla de precios de compra. Ordenados ascendentemente
/// por `min_credits`. El último tramo absorbe cualquier monto restante.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PurchaseTier {
    pub min_credits: i64,
    pub credits_per_usd: f64,
}

/// Tramo de fidelidad: a partir de `threshold` créditos consumidos
/// acumulados, se aplica `discount_percent` sobre el costo de operación.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyTier {
    pub threshold: i64,
    pub discount_percent: f64,
}

/// Configuración de tarifas completa, inyectada por construcción (nunca
/// leída de estado global) para que varias instancias puedan coexistir
/// en pruebas concurrentes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Tarifa base en créditos por USD. Usada como emisor plano (legacy)
    /// cuando no hay tramos configurados, y por `adminProcessPayment`.
    pub conversion_rate: f64,
    /// Tramos de compra ordenados por `min_credits` ascendente.
    pub purchase_tiers: Vec<PurchaseTier>,
    /// Umbral de unidades bajo el cual una solicitud se considera "bulk"
    /// (decisión del llamador; el motor sólo consume `options.is_bulk`).
    pub bulk_discount_threshold: i64,
    pub bulk_discount_percent: f64,
    /// Ventana de horas pico en UTC, medio-abierta `[start, end)`.
    pub peak_start_hour: u32,
    pub peak_end_hour: u32,
    pub peak_multiplier: f64,
    /// Tramos de fidelidad, no necesariamente ordenados; el motor los
    /// ordena descendentemente por `threshold` en cada consulta.
    pub loyalty_tiers: Vec<LoyaltyTier>,
    /// Tick del subunit del token nativo (p.ej. 1e-8 para 8 decimales),
    /// usado para redondear `amountForCredits` hacia arriba.
    pub sub_unit_tick: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            conversion_rate: 1000.0,
            purchase_tiers: vec![
                PurchaseTier { min_credits: 0, credits_per_usd: 1000.0 },
                PurchaseTier { min_credits: 50_000, credits_per_usd: 1_100.0 },
                PurchaseTier { min_credits: 250_000, credits_per_usd: 1_250.0 },
            ],
            bulk_discount_threshold: 10,
            bulk_discount_percent: 15.0,
            peak_start_hour: 13,
            peak_end_hour: 21,
            peak_multiplier: 1.2,
            loyalty_tiers: vec![
                LoyaltyTier { threshold: 1_000, discount_percent: 5.0 },
                LoyaltyTier { threshold: 10_000, discount_percent: 10.0 },
                LoyaltyTier { threshold: 100_000, discount_percent: 20.0 },
            ],
            sub_unit_tick: 1e-8,
        }
    }
}

/// Entrada estática del catálogo de costos de operación. Sembrado una sola
/// vez al inicializar el Credit Manager; consultado en modo solo-lectura.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationCost {
    pub name: String,
    pub base_cost: i64,
    pub category: String,
    /// Multiplicador de clase de red, si la operación define uno.
    pub network_class_multiplier: Option<f64>,
    /// Componente aditivo por tamaño de payload, en créditos por KB.
    pub size_multiplier: Option<f64>,
}

/// Opciones de una invocación concreta de `operationCost`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationCostOptions {
    pub is_bulk: bool,
    pub payload_size_kb: f64,
    /// Total histórico de créditos consumidos por la cuenta facturada,
    /// usado para resolver el tramo de fidelidad aplicable.
    pub user_total_consumed: i64,
}
