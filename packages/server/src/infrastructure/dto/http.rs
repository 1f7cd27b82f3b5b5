//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Entry in the public room listing (`GET /api/rooms`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    /// Participants currently in the live session; 0 when nobody joined yet.
    pub occupancy: usize,
    pub created_at: String,
}

/// Detail of a single room (`GET /api/rooms/{room_id}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub is_public: bool,
    pub occupancy: usize,
    pub participants: Vec<String>,
    pub created_at: String,
}

/// Body of `POST /api/rooms`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_room_request_defaults_to_public() {
        // given / when:
        let request: CreateRoomRequest =
            serde_json::from_str(r#"{"name":"movie night"}"#).unwrap();

        // then:
        assert_eq!(request.name, "movie night");
        assert!(request.is_public);
        assert_eq!(request.owner_id, None);
    }

    #[test]
    fn test_room_detail_omits_absent_owner() {
        // given:
        let detail = RoomDetailDto {
            id: "r1".to_string(),
            name: "movie night".to_string(),
            owner_id: None,
            is_public: true,
            occupancy: 2,
            participants: vec!["alice".to_string(), "bob".to_string()],
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };

        // when:
        let json = serde_json::to_string(&detail).unwrap();

        // then:
        assert!(!json.contains("owner_id"));
    }
}
