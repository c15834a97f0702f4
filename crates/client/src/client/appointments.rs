//! Appointment API operations.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use agenda_core::cache::{AppointmentSource, SourceError, GENERIC_FETCH_ERROR};
use agenda_core::calendar::RawAppointment;

use super::CrmClient;
use crate::error::{ClientError, Result};

/// Query parameters for the appointment range endpoint.
#[derive(Debug, Serialize)]
pub struct AppointmentRangeQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Response envelope of the appointment range endpoint.
#[derive(Debug, Deserialize)]
pub struct AppointmentsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub appointments: Vec<RawAppointment>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AppointmentsEnvelope {
    fn into_result(self) -> Result<Vec<RawAppointment>> {
        if self.success {
            Ok(self.appointments)
        } else {
            let message = self
                .error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FETCH_ERROR.to_string());
            Err(ClientError::Backend(message))
        }
    }
}

impl CrmClient {
    /// List appointments starting within `[start, end]`.
    pub async fn list_appointments(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawAppointment>> {
        let response = self
            .client
            .get(self.url("/api/appointments"))
            .query(&AppointmentRangeQuery { start, end })
            .send()
            .await?;
        let envelope: AppointmentsEnvelope = self.handle_response(response).await?;
        envelope.into_result()
    }
}

#[async_trait]
impl AppointmentSource for CrmClient {
    async fn fetch_appointments_by_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> std::result::Result<Vec<RawAppointment>, SourceError> {
        self.list_appointments(start, end)
            .await
            .map_err(SourceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::week::{WeekKey, WeekRange};
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn week_range() -> WeekRange {
        WeekRange::for_key(&WeekKey::from_date(
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_list_appointments_sends_range_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments"))
            .and(query_param("start", "2024-03-11T00:00:00"))
            .and(query_param("end", "2024-03-18T23:59:59.999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "appointments": [
                    {
                        "id": 41,
                        "contactId": 7,
                        "startTime": "2024-03-12T10:00:00",
                        "endTime": "2024-03-12T11:00:00",
                        "contactFirstName": "Ana",
                        "contactLastName": "Ruiz",
                        "status": "Completed",
                        "appointmentType": "Visita",
                        "tripTime": 15
                    },
                    {
                        "id": 42,
                        "startTime": "2024-03-14T17:30:00",
                        "endTime": "2024-03-14T18:00:00"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri());
        let range = week_range();
        let appointments = client.list_appointments(range.start, range.end).await.unwrap();

        assert_eq!(appointments.len(), 2);
        assert_eq!(appointments[0].id, 41);
        assert_eq!(appointments[0].contact_id, Some(7));
        assert_eq!(appointments[0].trip_time, Some(15));
        assert_eq!(appointments[1].contact_first_name, None);
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "No tiene permisos para ver esta agenda"
            })))
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri());
        let range = week_range();
        let result = client
            .fetch_appointments_by_range(range.start, range.end)
            .await;

        assert_eq!(
            result,
            Err(SourceError::Reported(
                "No tiene permisos para ver esta agenda".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_without_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri());
        let range = week_range();
        let result = client.list_appointments(range.start, range.end).await;

        assert!(matches!(result, Err(ClientError::Backend(m)) if m == GENERIC_FETCH_ERROR));
    }

    #[tokio::test]
    async fn test_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri());
        let range = week_range();
        let result = client
            .fetch_appointments_by_range(range.start, range.end)
            .await;

        match result {
            Err(err @ SourceError::Transport(_)) => {
                assert_eq!(err.user_message(), GENERIC_FETCH_ERROR);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = CrmClient::new(server.uri());
        let range = week_range();
        let result = client
            .fetch_appointments_by_range(range.start, range.end)
            .await;

        assert!(matches!(result, Err(SourceError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport() {
        let client = CrmClient::new("http://127.0.0.1:9");
        let range = week_range();

        let result = client
            .fetch_appointments_by_range(range.start, range.end)
            .await;

        assert!(matches!(result, Err(SourceError::Transport(_))));
    }
}
