use serde::{Deserialize, Serialize};

/// Адрес, к которому привязана запись.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Детали дела.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
}

/// Запись, возвращаемая upstream-источником.
///
/// Ядро её не интерпретирует: проверяется только форма при десериализации,
/// дальше запись передаётся подписчику как есть.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub age: i32,
    pub dob: String,
    pub address: Address,
    pub case_detail: CaseDetail,
}
