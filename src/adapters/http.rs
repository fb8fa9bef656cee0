use crate::core::render::GENERIC_SEARCH_ERROR;
use crate::domain::model::{Course, Endpoints, PrerequisiteMatch, Subject};
use crate::domain::ports::{CatalogApi, ConfigProvider};
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;
use url::Url;

/// reqwest 實作的課程目錄後端客戶端
pub struct HttpCatalogClient {
    client: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::build(base_url, Endpoints::default(), None)
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::build(
            config.base_url(),
            config.endpoints().clone(),
            config.request_timeout(),
        )
    }

    fn build(base_url: &str, endpoints: Endpoints, timeout: Option<Duration>) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| CatalogError::InvalidConfigValueError {
            field: "backend.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        // 確保以 '/' 結尾，相對端點才會接在既有路徑之後
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base,
            endpoints,
        })
    }

    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint)
            .map_err(|e| CatalogError::InvalidConfigValueError {
                field: "endpoints".to_string(),
                value: endpoint.to_string(),
                reason: format!("Cannot join with base URL: {}", e),
            })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
        fallback_error: &str,
    ) -> Result<T> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        tracing::debug!("{} responded with {}", endpoint, status);

        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(CatalogError::Server {
                status: status.as_u16(),
                message: server_message(&body, status, fallback_error),
            });
        }

        serde_json::from_slice(&body).map_err(|e| CatalogError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn subjects(&self) -> Result<Vec<Subject>> {
        let catalog: SubjectCatalog = self
            .fetch(&self.endpoints.subject_codes, &[], "")
            .await?;
        Ok(catalog.0)
    }

    async fn courses(&self, subject_url: &str) -> Result<Vec<Course>> {
        self.fetch(&self.endpoints.courses, &[("url", subject_url)], "")
            .await
    }

    async fn courses_with_prerequisite(
        &self,
        course_name: &str,
        course_number: &str,
    ) -> Result<Vec<PrerequisiteMatch>> {
        let body: serde_json::Value = self
            .fetch(
                &self.endpoints.prerequisites,
                &[("name", course_name), ("number", course_number)],
                GENERIC_SEARCH_ERROR,
            )
            .await?;

        prerequisite_matches(&self.endpoints.prerequisites, body)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

fn server_message(body: &[u8], status: StatusCode, fallback: &str) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| {
            if fallback.is_empty() {
                format!("Request failed with status {}", status)
            } else {
                fallback.to_string()
            }
        })
}

#[derive(Debug, Deserialize)]
struct PrerequisiteResponse {
    #[serde(default)]
    courses: Option<Vec<PrerequisiteMatch>>,
    #[serde(default)]
    error: Option<String>,
}

/// 2xx 但不是帶有 `courses` 的物件（例如 `[]` 或 `{}`）視為後端錯誤
fn prerequisite_matches(
    endpoint: &str,
    body: serde_json::Value,
) -> Result<Vec<PrerequisiteMatch>> {
    let response = if body.is_object() {
        PrerequisiteResponse::deserialize(body).map_err(|e| CatalogError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?
    } else {
        PrerequisiteResponse {
            courses: None,
            error: None,
        }
    };

    response.courses.ok_or_else(|| CatalogError::Server {
        status: StatusCode::OK.as_u16(),
        message: response
            .error
            .unwrap_or_else(|| GENERIC_SEARCH_ERROR.to_string()),
    })
}

/// `{display name: url}`, kept in document order.
struct SubjectCatalog(Vec<Subject>);

impl<'de> Deserialize<'de> for SubjectCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = SubjectCatalog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of subject display names to identifier URLs")
            }

            fn visit_map<M: MapAccess<'de>>(
                self,
                mut map: M,
            ) -> std::result::Result<Self::Value, M::Error> {
                let mut subjects = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((display_name, identifier_url)) =
                    map.next_entry::<String, String>()?
                {
                    subjects.push(Subject {
                        display_name,
                        identifier_url,
                    });
                }
                Ok(SubjectCatalog(subjects))
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subject_catalog_keeps_document_order() {
        let json = r#"{
            "Zoology": "https://cat/zool.html",
            "Accounting": "https://cat/acct.html",
            "Mathematics": "https://cat/math.html"
        }"#;

        let catalog: SubjectCatalog = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = catalog.0.iter().map(|s| s.display_name.as_str()).collect();

        assert_eq!(names, vec!["Zoology", "Accounting", "Mathematics"]);
        assert_eq!(catalog.0[1].identifier_url, "https://cat/acct.html");
    }

    #[test]
    fn test_subject_catalog_rejects_non_object() {
        assert!(serde_json::from_str::<SubjectCatalog>(r#"["a", "b"]"#).is_err());
        assert!(serde_json::from_str::<SubjectCatalog>(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_endpoint_url_joins_under_base_path() {
        let client = HttpCatalogClient::new("http://localhost:5000/api").unwrap();
        assert_eq!(
            client.endpoint_url("courses").unwrap().as_str(),
            "http://localhost:5000/api/courses"
        );

        let root = HttpCatalogClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            root.endpoint_url("subject-codes").unwrap().as_str(),
            "http://localhost:5000/subject-codes"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpCatalogClient::new("not a url").err().unwrap();
        assert!(matches!(err, CatalogError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_prerequisite_body_without_courses_is_server_error() {
        for body in [json!([]), json!("ok"), json!({}), json!({"courses": null})] {
            match prerequisite_matches("all-courses-with-prerequisite", body) {
                Err(CatalogError::Server { status, message }) => {
                    assert_eq!(status, 200);
                    assert_eq!(message, GENERIC_SEARCH_ERROR);
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }

        let err = prerequisite_matches(
            "all-courses-with-prerequisite",
            json!({"error": "Course not found"}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Course not found");
    }

    #[test]
    fn test_prerequisite_body_with_bad_entries_is_malformed() {
        let err = prerequisite_matches(
            "all-courses-with-prerequisite",
            json!({"courses": [{"subject": "CS"}]}),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse { .. }));
    }

    #[test]
    fn test_server_message_prefers_error_field() {
        let body = br#"{"error": "No subject URL provided"}"#;
        assert_eq!(
            server_message(body, StatusCode::BAD_REQUEST, ""),
            "No subject URL provided"
        );
        assert_eq!(
            server_message(b"<html>oops</html>", StatusCode::BAD_GATEWAY, ""),
            "Request failed with status 502 Bad Gateway"
        );
        assert_eq!(
            server_message(b"{}", StatusCode::INTERNAL_SERVER_ERROR, GENERIC_SEARCH_ERROR),
            GENERIC_SEARCH_ERROR
        );
    }
}
