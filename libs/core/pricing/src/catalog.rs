// [libs/core/pricing/src/catalog.rs]
/*!
 * APARATO: CATÁLOGO SEMILLA DE COSTOS DE OPERACIÓN (ESTRATO L1-CORE)
 * RESPONSABILIDAD: TABLA ESTÁTICA DE COSTOS BASE POR OPERACIÓN
 *
 * Sembrado una sola vez por el Credit Manager al arrancar (`initialize`).
 * Las categorías reflejan las clases de operación descendente de blockchain
 * descritas en el contrato del módulo: consulta, transferencia, contrato,
 * administrativa.
 */

use std::collections::HashMap;

use tollgate_domain_models::OperationCost;

/// Construye el catálogo semilla de costos de operación. Devuelto como un
/// `HashMap` indexado por nombre de operación, listo para ser persistido por
/// la capa de almacenamiento o consultado directamente en memoria.
pub fn seed_operation_costs() -> HashMap<String, OperationCost> {
    let entries = vec![
        OperationCost {
            name: "account.balance.query".to_string(),
            base_cost: 0,
            category: "query".to_string(),
            network_class_multiplier: None,
            size_multiplier: None,
        },
        OperationCost {
            name: "transaction.status.query".to_string(),
            base_cost: 1,
            category: "query".to_string(),
            network_class_multiplier: None,
            size_multiplier: None,
        },
        OperationCost {
            name: "transfer.native".to_string(),
            base_cost: 10,
            category: "transfer".to_string(),
            network_class_multiplier: Some(1.0),
            size_multiplier: None,
        },
        OperationCost {
            name: "transfer.token".to_string(),
            base_cost: 15,
            category: "transfer".to_string(),
            network_class_multiplier: Some(1.2),
            size_multiplier: None,
        },
        OperationCost {
            name: "contract.call".to_string(),
            base_cost: 25,
            category: "contract".to_string(),
            network_class_multiplier: Some(1.5),
            size_multiplier: Some(0.5),
        },
        OperationCost {
            name: "contract.deploy".to_string(),
            base_cost: 200,
            category: "contract".to_string(),
            network_class_multiplier: Some(2.0),
            size_multiplier: Some(2.0),
        },
        OperationCost {
            name: "topic.message.submit".to_string(),
            base_cost: 5,
            category: "consensus".to_string(),
            network_class_multiplier: Some(1.0),
            size_multiplier: Some(0.25),
        },
        OperationCost {
            name: "admin.account.create".to_string(),
            base_cost: 50,
            category: "admin".to_string(),
            network_class_multiplier: None,
            size_multiplier: None,
        },
    ];

    entries.into_iter().map(|e| (e.name.clone(), e)).collect()
}
