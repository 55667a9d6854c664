use std::sync::Arc;

use serde::Deserialize;

use crate::QueryError;

/// Сырые аргументы query-триггера, как они приходят от транспортного слоя.
///
/// Все поля необязательны на уровне десериализации: отсутствие поля
/// обнаруживается при проверке и возвращается вызывающему как
/// [`QueryError::MissingField`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryArgs {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_in_miles: Option<f64>,
    #[serde(alias = "userID")]
    pub correlation_id: Option<String>,
}

/// Проверенный пространственный запрос.
///
/// Неизменяем; создаётся только через [`Query::try_from`]. Диапазоны
/// координат не проверяются: это право upstream-источника.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    latitude: f64,
    longitude: f64,
    radius_in_miles: f64,
    correlation_id: Arc<str>,
}

impl QueryArgs {
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius_in_miles: f64,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            radius_in_miles: Some(radius_in_miles),
            correlation_id: Some(correlation_id.into()),
        }
    }
}

impl Query {
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn radius_in_miles(&self) -> f64 {
        self.radius_in_miles
    }

    pub fn correlation_id(&self) -> &Arc<str> {
        &self.correlation_id
    }
}

fn finite(
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, QueryError> {
    let value = value.ok_or(QueryError::MissingField { field })?;
    if !value.is_finite() {
        return Err(QueryError::NonFinite { field, value });
    }
    Ok(value)
}

impl TryFrom<QueryArgs> for Query {
    type Error = QueryError;

    fn try_from(args: QueryArgs) -> Result<Self, Self::Error> {
        let latitude = finite("latitude", args.latitude)?;
        let longitude = finite("longitude", args.longitude)?;
        let radius_in_miles = finite("radiusInMiles", args.radius_in_miles)?;
        let correlation_id = args.correlation_id.ok_or(QueryError::MissingField {
            field: "correlationId",
        })?;
        if correlation_id.trim().is_empty() {
            return Err(QueryError::BlankCorrelationId);
        }

        Ok(Self {
            latitude,
            longitude,
            radius_in_miles,
            correlation_id: Arc::from(correlation_id),
        })
    }
}
