use std::{fmt, sync::Arc};

use reqwest::Url;

use crate::ConfigError;

/// Один зарегистрированный источник: имя и полный URL эндпоинта.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoint {
    name: Arc<str>,
    url: Url,
}

impl SourceEndpoint {
    pub fn new(
        name: impl Into<Arc<str>>,
        url: Url,
    ) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }

    /// Собирает эндпоинт из базового URL и пути источника.
    ///
    /// Путь добавляется к базе, даже если в базе уже есть свой префикс
    /// (`http://host/api` + `/theft` → `http://host/api/theft`).
    pub fn resolve(
        name: &str,
        base_url: &str,
        path: &str,
    ) -> Result<Self, ConfigError> {
        let invalid = |url: &str, reason: String| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url).map_err(|e| invalid(base_url, e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid(base_url, "cannot be a base url".to_string()));
        }
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }

        let url = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| invalid(path, e.to_string()))?;

        Ok(Self::new(name, url))
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for SourceEndpoint {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_path() {
        let ep = SourceEndpoint::resolve(
            "homicide",
            "http://localhost:8080",
            "/homicide-records/records-in-radius",
        )
        .unwrap();
        assert_eq!(&**ep.name(), "homicide");
        assert_eq!(
            ep.url().as_str(),
            "http://localhost:8080/homicide-records/records-in-radius"
        );
    }

    #[test]
    fn test_resolve_keeps_base_prefix() {
        let ep = SourceEndpoint::resolve("theft", "http://svc/api", "theft-records").unwrap();
        assert_eq!(ep.url().as_str(), "http://svc/api/theft-records");
    }

    #[test]
    fn test_resolve_rejects_bad_base() {
        let err = SourceEndpoint::resolve("x", "not a url", "/p").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = SourceEndpoint::resolve("x", "mailto:someone@example.com", "/p").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
