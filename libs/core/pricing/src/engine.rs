// [libs/core/pricing/src/engine.rs]
/*!
 * =================================================================
 * APARATO: PRICING ENGINE (V1.0 - NÚCLEO PURO)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L1-CORE)
 * RESPONSABILIDAD: MATEMÁTICA DE TRAMOS Y COMPOSICIÓN DE MODIFICADORES
 *
 * Funciones puras, sin efectos secundarios, sin I/O. El orden de composición
 * de modificadores en `operation_cost` es parte del contrato: (1) clase de
 * red, (2) tamaño de payload, (3) bulk, (4) fidelidad, (5) horas pico.
 * Cambiar el orden produce resultados enteros distintos tras el redondeo
 * hacia arriba; los tests fijan este orden (ver SPEC_FULL §8).
 * =================================================================
 */

use std::collections::HashMap;

use chrono::{DateTime, Timelike, Utc};
use tollgate_domain_models::{OperationCost, OperationCostOptions, PricingConfig, PurchaseTier};
use tracing::warn;

/// Convierte un monto en USD a créditos recorriendo los tramos de compra
/// ordenados por `min_credits`, acumulando créditos al ritmo de
/// `credits_per_usd` de cada tramo hasta agotar el monto.
///
/// Montos `<= 0` producen 0. El resultado se redondea hacia abajo (floor).
pub fn credits_for_amount(amount_usd: f64, config: &PricingConfig) -> i64 {
    if amount_usd <= 0.0 {
        return 0;
    }

    let tiers = sorted_tiers(&config.purchase_tiers);
    if tiers.is_empty() {
        return (amount_usd * config.conversion_rate).floor() as i64;
    }

    let mut remaining_usd = amount_usd;
    let mut accumulated_credits = 0.0f64;

    for (index, tier) in tiers.iter().enumerate() {
        if remaining_usd <= 1e-12 {
            break;
        }
        let bracket_width_credits = bracket_width(&tiers, index);
        let usd_taken = match bracket_width_credits {
            Some(width) => remaining_usd.min(width as f64 / tier.credits_per_usd),
            None => remaining_usd,
        };
        accumulated_credits += usd_taken * tier.credits_per_usd;
        remaining_usd -= usd_taken;
    }

    accumulated_credits.floor() as i64
}

/// Inversa de `credits_for_amount`: dado un número de créditos, calcula el
/// monto en USD necesario, recorriendo los mismos tramos en sentido inverso.
/// El resultado se redondea hacia arriba (ceiling) al tick del subunit del
/// token nativo, de forma que nunca se subestime el monto requerido.
pub fn amount_for_credits(credits: i64, config: &PricingConfig) -> f64 {
    if credits <= 0 {
        return 0.0;
    }

    let tiers = sorted_tiers(&config.purchase_tiers);
    let raw_amount = if tiers.is_empty() {
        credits as f64 / config.conversion_rate
    } else {
        let mut remaining_credits = credits as f64;
        let mut amount_usd = 0.0f64;

        for (index, tier) in tiers.iter().enumerate() {
            if remaining_credits <= 1e-9 {
                break;
            }
            let bracket_width_credits = bracket_width(&tiers, index);
            let credits_taken = match bracket_width_credits {
                Some(width) => remaining_credits.min(width as f64),
                None => remaining_credits,
            };
            amount_usd += credits_taken / tier.credits_per_usd;
            remaining_credits -= credits_taken;
        }
        amount_usd
    };

    ceil_to_tick(raw_amount, config.sub_unit_tick)
}

/// Calcula el costo final de una operación, componiendo modificadores en el
/// orden fijo descrito en el contrato del módulo. Un nombre de operación
/// desconocido se trata como gratuito (costo 0) con una advertencia, ya que
/// la capa de transporte puede exponer nombres administrativos fuera del
/// catálogo.
pub fn operation_cost(
    catalog: &HashMap<String, OperationCost>,
    operation_name: &str,
    config: &PricingConfig,
    options: OperationCostOptions,
    now: DateTime<Utc>,
) -> i64 {
    let Some(entry) = catalog.get(operation_name) else {
        warn!(
            "⚠️ [PRICING_UNKNOWN_OPERATION]: '{}' is not in the catalog; treating as free.",
            operation_name
        );
        return 0;
    };

    let mut cost = entry.base_cost as f64;

    // (1) Multiplicador de clase de red, si la operación define uno.
    if let Some(network_multiplier) = entry.network_class_multiplier {
        cost *= network_multiplier;
    }

    // (2) Componente aditivo por tamaño de payload.
    if let Some(size_multiplier) = entry.size_multiplier {
        cost += options.payload_size_kb * size_multiplier;
    }

    // (3) Multiplicador bulk.
    if options.is_bulk {
        cost *= bulk_multiplier(config.bulk_discount_percent);
    }

    // (4) Multiplicador de fidelidad: primer tramo descendente cuyo umbral
    // sea <= al consumo histórico total del usuario.
    if let Some(loyalty_multiplier) = loyalty_multiplier_for(config, options.user_total_consumed) {
        cost *= loyalty_multiplier;
    }

    // (5) Multiplicador de horas pico (ventana UTC medio-abierta).
    if is_peak_hour(now, config.peak_start_hour, config.peak_end_hour) {
        cost *= config.peak_multiplier;
    }

    cost.ceil() as i64
}

fn sorted_tiers(tiers: &[PurchaseTier]) -> Vec<PurchaseTier> {
    let mut sorted = tiers.to_vec();
    sorted.sort_by(|a, b| a.min_credits.cmp(&b.min_credits));
    sorted
}

/// Ancho en créditos del tramo `index`, o `None` si es el último tramo
/// (capacidad ilimitada: absorbe cualquier monto restante).
fn bracket_width(tiers: &[PurchaseTier], index: usize) -> Option<i64> {
    tiers
        .get(index + 1)
        .map(|next| next.min_credits - tiers[index].min_credits)
}

fn bulk_multiplier(bulk_discount_percent: f64) -> f64 {
    (100.0 - bulk_discount_percent) / 100.0
}

fn loyalty_multiplier_for(config: &PricingConfig, user_total_consumed: i64) -> Option<f64> {
    let mut tiers = config.loyalty_tiers.clone();
    tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));
    tiers
        .iter()
        .find(|tier| tier.threshold <= user_total_consumed)
        .map(|tier| (100.0 - tier.discount_percent) / 100.0)
}

fn is_peak_hour(now: DateTime<Utc>, peak_start_hour: u32, peak_end_hour: u32) -> bool {
    let hour = now.hour();
    if peak_start_hour <= peak_end_hour {
        hour >= peak_start_hour && hour < peak_end_hour
    } else {
        // Ventana que envuelve medianoche (p.ej. 22 -> 4).
        hour >= peak_start_hour || hour < peak_end_hour
    }
}

fn ceil_to_tick(amount: f64, tick: f64) -> f64 {
    if tick <= 0.0 {
        return amount;
    }
    (amount / tick).ceil() * tick
}
