use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub holes: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tee {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub rating: f64,
    pub slope: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Yardages {
    pub black: u32,
    pub gold: u32,
    pub blue: u32,
    pub white: u32,
    pub red: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoleDefinition {
    pub course_id: i64,
    pub hole_number: u8,
    pub par: u8,
    pub handicap_index: u8,
    pub yardages: Yardages,
}
