// [libs/domain/facade/src/facade.rs]
/*!
 * =================================================================
 * APARATO: OPERATION FACADE (V1.0)
 * CLASIFICACIÓN: DOMAIN LOGIC (ESTRATO L6)
 * RESPONSABILIDAD: ÚNICO PUNTO DE CONTACTO DE LA CAPA DE TRANSPORTE
 *
 * Orquesta autenticación -> resolución de cuenta -> suficiencia -> consumo
 * -> colaborador downstream -> respuesta estructurada. No mantiene estado
 * propio: delega toda mutación al `CreditManager` inyectado y nunca retiene
 * sus locks de serialización mientras invoca al colaborador (ver §5,
 * Reentrancy).
 * =================================================================
 */

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};

use tollgate_domain_manager::CreditManager;
use tollgate_domain_models::OperationCostOptions;

use crate::collaborator::Collaborator;
use crate::errors::FacadeError;

#[derive(Debug, Clone, serde::Serialize)]
pub struct OperationResponse {
    pub operation: String,
    pub status: String,
    pub result: Value,
}

pub struct OperationFacade {
    manager: Arc<CreditManager>,
    collaborator: Arc<dyn Collaborator>,
}

impl OperationFacade {
    pub fn new(manager: Arc<CreditManager>, collaborator: Arc<dyn Collaborator>) -> Self {
        Self { manager, collaborator }
    }

    /// Resuelve la cuenta a facturar: el `caller_account` por defecto, salvo
    /// que `bill_override` esté presente y `is_admin` lo autorice.
    fn resolve_billed_account<'a>(
        &self,
        caller_account: &'a str,
        is_admin: bool,
        bill_override: Option<&'a str>,
    ) -> Result<&'a str, FacadeError> {
        match bill_override {
            Some(target) if target != caller_account && !is_admin => Err(FacadeError::Forbidden(format!(
                "caller '{}' may not bill operations to '{}'",
                caller_account, target
            ))),
            Some(target) => Ok(target),
            None => Ok(caller_account),
        }
    }

    /// Ejecuta una operación tarifada de extremo a extremo. Paso 1
    /// (autenticación) se asume ya resuelto por el llamador transporte, que
    /// entrega `caller_account` ya verificada; esta frontera sólo valida
    /// autorización de facturación (paso 2) en adelante.
    #[instrument(skip(self, args, options))]
    pub async fn execute_operation(
        &self,
        caller_account: &str,
        is_admin: bool,
        bill_override: Option<&str>,
        operation_name: &str,
        args: Value,
        options: OperationCostOptions,
    ) -> Result<OperationResponse, FacadeError> {
        let billed_account = self.resolve_billed_account(caller_account, is_admin, bill_override)?;

        let sufficiency = self
            .manager
            .sufficiency(billed_account, operation_name, options)
            .await
            .map_err(|e| FacadeError::Failed(e.to_string()))?;

        if !sufficiency.sufficient {
            return Err(FacadeError::InsufficientCredits {
                required: sufficiency.required,
                current: sufficiency.current,
                shortfall: sufficiency.shortfall,
            });
        }

        let consumed = self
            .manager
            .consume(billed_account, operation_name, None, options)
            .await
            .map_err(|e| FacadeError::Failed(e.to_string()))?;

        if !consumed {
            warn!(
                "⚠️ [OPERATION_FACADE]: consume raced to insufficient for '{}' on '{}'",
                operation_name, billed_account
            );
            return Err(FacadeError::Failed(format!(
                "consumption failed for operation '{}'",
                operation_name
            )));
        }

        // La consumición ya ocurrió y se mantiene sin importar el desenlace
        // del colaborador: el trabajo downstream fue planeado y los
        // recursos retenidos (§4.6, paso 5).
        let collaborator_result = self.collaborator.invoke(operation_name, args).await;

        match collaborator_result {
            Ok(result) => {
                info!("✅ [OPERATION_FACADE]: '{}' completed for '{}'", operation_name, billed_account);
                Ok(OperationResponse {
                    operation: operation_name.to_string(),
                    status: "ok".to_string(),
                    result,
                })
            }
            Err(message) => {
                warn!(
                    "⚠️ [OPERATION_FACADE]: collaborator failed for '{}' on '{}': {}",
                    operation_name, billed_account, message
                );
                Err(FacadeError::Failed(message))
            }
        }
    }
}
