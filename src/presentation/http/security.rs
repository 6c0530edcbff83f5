use poem::{Error as PoemError, Result as PoemResult, http::StatusCode};
use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

/// Static service-key bearer scheme for the batch endpoint.
#[derive(SecurityScheme)]
#[oai(ty = "bearer")]
pub struct ServiceKeyAuth(pub Bearer);

impl ServiceKeyAuth {
    pub fn verify(&self, service_key: &str) -> PoemResult<()> {
        if self.0.token == service_key {
            Ok(())
        } else {
            Err(PoemError::from_string(
                "invalid service key",
                StatusCode::UNAUTHORIZED,
            ))
        }
    }
}
