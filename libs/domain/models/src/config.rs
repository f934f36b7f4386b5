// [libs/domain/models/src/config.rs]
/*!
 * APARATO: CORE CONFIGURATION STRUCT (ESTRATO L2)
 * RESPONSABILIDAD: PARÁMETROS OPERATIVOS INYECTADOS POR CONSTRUCCIÓN
 *
 * Se construye explícitamente (por ejemplo vía `from_env`) y se pasa por
 * valor a cada componente; ningún call site lee estado global, de forma
 * que varios `CreditManager` puedan correr en paralelo durante pruebas.
 */

use crate::pricing_config::PricingConfig;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub database_url: String,
    pub pricing: PricingConfig,
    /// Monto mínimo de pago aceptado por el Payment Builder (unidad nativa).
    pub min_payment: f64,
    /// Monto máximo de pago aceptado por el Payment Builder (unidad nativa).
    pub max_payment: f64,
    /// Cuenta destino de las transferencias de pago (usada por el Reconciler
    /// para identificar la pata entrante).
    pub server_account_id: String,
    /// Selecciona los endpoints de oráculo y los multiplicadores de clase de red.
    pub network: String,
    pub reconcile_interval_ms: u64,
    pub max_pending_age_sec: i64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_url: "memory://".to_string(),
            pricing: PricingConfig::default(),
            min_payment: 0.001,
            max_payment: 10_000.0,
            server_account_id: "0.0.0".to_string(),
            network: "mainnet".to_string(),
            reconcile_interval_ms: 30_000,
            max_pending_age_sec: 300,
        }
    }
}

impl CoreConfig {
    /// Carga la configuración desde variables de entorno (opcionalmente
    /// precargadas vía `.env` con `dotenvy`), cayendo en los valores por
    /// defecto cuando una variable está ausente o es ilegible.
    ///
    /// Esto es plomería ambiental equivalente a la carga de configuración
    /// del binario del orquestador del repositorio maestro; no es una CLI
    /// de desarrollador y por lo tanto no cae dentro de los Non-goals.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            pricing: defaults.pricing,
            min_payment: std::env::var("MIN_PAYMENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_payment),
            max_payment: std::env::var("MAX_PAYMENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_payment),
            server_account_id: std::env::var("SERVER_ACCOUNT_ID")
                .unwrap_or(defaults.server_account_id),
            network: std::env::var("NETWORK").unwrap_or(defaults.network),
            reconcile_interval_ms: std::env::var("RECONCILE_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.reconcile_interval_ms),
            max_pending_age_sec: std::env::var("MAX_PENDING_AGE_SEC")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_pending_age_sec),
        }
    }
}
