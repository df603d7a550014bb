/// Upstream access credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub value: String,
    pub source: CredentialSource,
}

/// Where the credential came from on this call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Cache,
    Issued,
}

impl Credential {
    pub fn cached(value: String) -> Self {
        Self {
            value,
            source: CredentialSource::Cache,
        }
    }

    pub fn issued(value: String) -> Self {
        Self {
            value,
            source: CredentialSource::Issued,
        }
    }

    /// First characters only, for logs
    pub fn masked(&self) -> String {
        let head: String = self.value.chars().take(6).collect();
        format!("{}***", head)
    }
}
