/*
[INPUT]:  Candidate service URL, tenant name and the day token
[OUTPUT]: Validated tenant code
[POS]:    HTTP layer - tenant validation handshake (gates all other calls)
[UPDATE]: When the validation route or reply shape changes
*/

use chrono::NaiveDate;
use reqwest::{Method, Url};
use tracing::{info, warn};

use crate::auth::build_day_token;
use crate::http::{CollectorClient, CollectorError, Result};
use crate::types::{TenantValidationResponse, normalize_base_url};

impl CollectorClient {
    /// Validate a tenant name against a candidate service URL using today's token
    ///
    /// GET {base}/api/valida_tenant/by_name/tn={tenant}/t={dayToken}
    pub async fn validate_tenant(&self, base_url: &str, tenant_input: &str) -> Result<String> {
        let today = chrono::Local::now().date_naive();
        self.validate_tenant_on(base_url, tenant_input, today).await
    }

    /// Validate a tenant with the token of an explicit calendar date
    pub async fn validate_tenant_on(
        &self,
        base_url: &str,
        tenant_input: &str,
        date: NaiveDate,
    ) -> Result<String> {
        let url = tenant_validation_url(base_url, tenant_input, date)?;
        info!(tenant = tenant_input.trim(), "validating tenant");

        let reply: TenantValidationResponse =
            self.send_json(self.request_url(Method::GET, url)).await?;

        match reply.validated_code() {
            Some(code) => {
                info!(tenant = tenant_input.trim(), code, "tenant validated");
                Ok(code.to_string())
            }
            None => {
                warn!(tenant = tenant_input.trim(), "validation reply without tenant code");
                Err(CollectorError::Validation(
                    "Retorno da API inválido: tenatCode não encontrado.".to_string(),
                ))
            }
        }
    }
}

fn tenant_validation_url(base_url: &str, tenant_input: &str, date: NaiveDate) -> Result<Url> {
    let base = normalize_base_url(base_url);
    if base.is_empty() {
        return Err(CollectorError::missing_service_url());
    }
    let tenant = tenant_input.trim();
    if tenant.is_empty() {
        return Err(CollectorError::Configuration(
            "Código da empresa não informado.".to_string(),
        ));
    }

    let mut url = Url::parse(&base)?;
    url.path_segments_mut()
        .map_err(|_| CollectorError::Configuration(format!("URL base inválida: {base}")))?
        .pop_if_empty()
        .extend([
            "api".to_string(),
            "valida_tenant".to_string(),
            "by_name".to_string(),
            format!("tn={tenant}"),
            format!("t={}", build_day_token(date)),
        ]);
    Ok(url)
}
