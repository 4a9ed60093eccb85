use shared::{CompanyConfig, Result};
use tracing::{error, info};

use super::dian_api::DianApiClient;
use crate::domains::edi::Notices;
use crate::models::Environment;

/// Result of a production-flag change request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EnvironmentChange {
    pub is_not_test: bool,
    pub changed: bool,
    pub notices: Notices,
}

/// Pushes the environment and reads it back; true only when the API now
/// reports `environment`.
async fn update_environment(client: &DianApiClient, environment: Environment, notices: &mut Notices) -> Result<bool> {
    if let Some(message) = client.put_environment(environment).await? {
        notices.info(message);
    }

    let status = client.get_environment().await?;
    let confirmed = status.type_environment_id == Some(environment.id());
    if confirmed {
        notices.info("Se ha actualizado el entorno. Ahora, sincronice las resoluciones");
    }
    if let Some(message) = status.message {
        notices.info(message);
    }
    Ok(confirmed)
}

/// Switches `company` between production and enablement. The flag only
/// moves when the API confirms the new environment.
pub async fn set_production(client: &DianApiClient, company: &mut CompanyConfig, is_not_test: bool) -> EnvironmentChange {
    let mut notices = Notices::default();
    if company.is_not_test == is_not_test {
        return EnvironmentChange {
            is_not_test,
            changed: false,
            notices,
        };
    }

    let environment = Environment::from_production_flag(is_not_test);
    let confirmed = match update_environment(client, environment, &mut notices).await {
        Ok(confirmed) => confirmed,
        Err(e) => {
            error!("Error de comunicación al cambiar el entorno: {}", e);
            notices.warning(format!("No se pudo cambiar el entorno: {}", e));
            false
        }
    };

    if confirmed {
        company.is_not_test = is_not_test;
        info!("Entorno DIAN actualizado a {:?}", environment);
    }

    EnvironmentChange {
        is_not_test: company.is_not_test,
        changed: confirmed,
        notices,
    }
}
