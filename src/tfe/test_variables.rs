//! TFE Registry Module Test Variables
//!
//! Variables made available to the test runs of a private registry module.
//! Modules are addressed as `<organization>/<name>/<provider>`; the namespace
//! of a private module is its organization.

use super::client::{segment, TfeClient};
use super::error::{Result, TfeError};
use super::models::{document_data, Variable, VariableCategory};
use serde_json::json;

/// Private registry module coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryModuleId {
    pub organization: String,
    pub name: String,
    pub provider: String,
}

impl std::str::FromStr for RegistryModuleId {
    type Err = TfeError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [organization, name, provider]
                if !organization.is_empty() && !name.is_empty() && !provider.is_empty() =>
            {
                Ok(Self {
                    organization: organization.to_string(),
                    name: name.to_string(),
                    provider: provider.to_string(),
                })
            }
            _ => Err(TfeError::InvalidRequest(format!(
                "invalid registry module {} (expected <ORGANIZATION>/<NAME>/<PROVIDER>)",
                s
            ))),
        }
    }
}

/// Options for creating a test variable
#[derive(Debug, Clone)]
pub struct VariableCreateOptions {
    pub key: String,
    pub value: String,
    pub description: String,
    pub category: VariableCategory,
    pub hcl: bool,
    pub sensitive: bool,
}

fn vars_url(client: &TfeClient, module: &RegistryModuleId) -> String {
    client.api_url(&format!(
        "organizations/{org}/tests/registry-modules/private/{org}/{name}/{provider}/vars",
        org = segment(&module.organization),
        name = segment(&module.name),
        provider = segment(&module.provider),
    ))
}

/// List the test variables of a module
pub async fn list_test_variables(
    client: &TfeClient,
    module: &RegistryModuleId,
) -> Result<Vec<Variable>> {
    let url = vars_url(client, module);
    client
        .get_all(&url)
        .await?
        .iter()
        .map(Variable::try_from)
        .collect()
}

/// Read a single test variable by id
///
/// The service has no per-variable read endpoint, so this scans the list.
pub async fn read_test_variable(
    client: &TfeClient,
    module: &RegistryModuleId,
    variable_id: &str,
) -> Result<Variable> {
    list_test_variables(client, module)
        .await?
        .into_iter()
        .find(|v| v.id == variable_id)
        .ok_or(TfeError::NotFound)
}

/// Create a test variable
pub async fn create_test_variable(
    client: &TfeClient,
    module: &RegistryModuleId,
    options: &VariableCreateOptions,
) -> Result<Variable> {
    let url = vars_url(client, module);
    let body = json!({
        "data": {
            "type": "vars",
            "attributes": {
                "key": options.key,
                "value": options.value,
                "description": options.description,
                "category": options.category.as_str(),
                "hcl": options.hcl,
                "sensitive": options.sensitive,
            }
        }
    });

    tracing::debug!("Create test variable {} for module {}", options.key, module.name);
    let response = client.post(&url, &body).await?;
    Variable::try_from(document_data(&response, "variable")?)
}

/// Delete a test variable
pub async fn delete_test_variable(
    client: &TfeClient,
    module: &RegistryModuleId,
    variable_id: &str,
) -> Result<()> {
    let url = format!("{}/{}", vars_url(client, module), segment(variable_id));
    tracing::debug!("Delete test variable {}", variable_id);
    client.delete(&url).await?;
    Ok(())
}
