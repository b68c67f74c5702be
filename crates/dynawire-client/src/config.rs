//! Endpoint configuration.

use std::fmt;

/// A resolved service endpoint.
///
/// Immutable once constructed; concurrent calls share one endpoint by
/// reference through the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    name: String,
    region: String,
    host: String,
    tls: bool,
    url: String,
}

impl Endpoint {
    /// Build a custom endpoint, e.g. for a local development server:
    ///
    /// ```
    /// use dynawire_client::Endpoint;
    ///
    /// let dev = Endpoint::custom("dev", "eu-west-1", "localhost:8000", false);
    /// assert_eq!(dev.url(), "http://localhost:8000/");
    /// ```
    #[must_use]
    pub fn custom(
        name: impl Into<String>,
        region: impl Into<String>,
        host: impl Into<String>,
        tls: bool,
    ) -> Self {
        let host = host.into();
        let scheme = if tls { "https" } else { "http" };
        let url = format!("{scheme}://{host}/");
        Self {
            name: name.into(),
            region: region.into(),
            host,
            tls,
            url,
        }
    }

    fn regional(name: &str, region: &str) -> Self {
        Self::custom(name, region, format!("dynamodb.{region}.amazonaws.com"), true)
    }

    /// Tokyo.
    #[must_use]
    pub fn ap_northeast_1() -> Self {
        Self::regional("Tokyo", "ap-northeast-1")
    }

    /// Singapore.
    #[must_use]
    pub fn ap_southeast_1() -> Self {
        Self::regional("Singapore", "ap-southeast-1")
    }

    /// Sydney.
    #[must_use]
    pub fn ap_southeast_2() -> Self {
        Self::regional("Sydney", "ap-southeast-2")
    }

    /// Ireland.
    #[must_use]
    pub fn eu_west_1() -> Self {
        Self::regional("Ireland", "eu-west-1")
    }

    /// Sao Paulo.
    #[must_use]
    pub fn sa_east_1() -> Self {
        Self::regional("Sao Paulo", "sa-east-1")
    }

    /// N. Virginia.
    #[must_use]
    pub fn us_east_1() -> Self {
        Self::regional("N. Virginia", "us-east-1")
    }

    /// N. California.
    #[must_use]
    pub fn us_west_1() -> Self {
        Self::regional("N. California", "us-west-1")
    }

    /// Oregon.
    #[must_use]
    pub fn us_west_2() -> Self {
        Self::regional("Oregon", "us-west-2")
    }

    /// Human-readable endpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The region bound into every request signature.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The host requests are addressed to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether requests travel over TLS.
    #[must_use]
    pub fn tls(&self) -> bool {
        self.tls
    }

    /// The resolved base URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.name, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_resolve_regional_endpoint_over_tls() {
        let endpoint = Endpoint::us_east_1();
        assert_eq!(endpoint.region(), "us-east-1");
        assert_eq!(endpoint.host(), "dynamodb.us-east-1.amazonaws.com");
        assert!(endpoint.tls());
        assert_eq!(endpoint.url(), "https://dynamodb.us-east-1.amazonaws.com/");
    }

    #[test]
    fn test_should_resolve_custom_endpoint_without_tls() {
        let endpoint = Endpoint::custom("dev", "local", "localhost:9091", false);
        assert_eq!(endpoint.url(), "http://localhost:9091/");
        assert_eq!(endpoint.to_string(), "<dev: localhost:9091>");
    }
}
