use async_trait::async_trait;
use galley_application::{RecordsCreate, RecordsGateway, RecordsQuery};
use galley_core::{AppError, AppResult};
use serde_json::{Value, json};
use url::Url;

use crate::vendor_http::{endpoint, parse_base_url, send_vendor_request};


const VENDOR: &str = "records vendor";

/// Records gateway backed by the Airtable REST API.
#[derive(Clone)]
pub struct AirtableRecordsGateway {
    http_client: reqwest::Client,
    api_url: Url,
    base_id: String,
    api_key: String,
}

impl AirtableRecordsGateway {
    /// Creates a gateway for one Airtable base.
    pub fn new(
        http_client: reqwest::Client,
        api_url: &str,
        base_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> AppResult<Self> {
        let base_id = base_id.into();
        if base_id.trim().is_empty() {
            return Err(AppError::Configuration(
                "AIRTABLE_BASE_ID must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            http_client,
            api_url: parse_base_url("AIRTABLE_API_URL", api_url)?,
            base_id,
            api_key: api_key.into(),
        })
    }

    fn table_url(&self, table: &str) -> AppResult<Url> {
        endpoint(&self.api_url, &["v0", self.base_id.as_str(), table])
    }
}

#[async_trait]
impl RecordsGateway for AirtableRecordsGateway {
    async fn query_records(&self, query: &RecordsQuery) -> AppResult<Value> {
        let mut url = self.table_url(query.table.as_str())?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(formula) = &query.filter_by_formula {
                pairs.append_pair("filterByFormula", formula);
            }
            if let Some(max_records) = query.max_records {
                pairs.append_pair("maxRecords", max_records.to_string().as_str());
            }
            if let Some(view) = &query.view {
                pairs.append_pair("view", view);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        send_vendor_request(
            VENDOR,
            self.http_client
                .get(url)
                .bearer_auth(self.api_key.as_str()),
        )
        .await
    }

    async fn create_records(&self, request: &RecordsCreate) -> AppResult<Value> {
        let url = self.table_url(request.table.as_str())?;
        let records = request
            .rows
            .iter()
            .map(|fields| json!({ "fields": fields }))
            .collect::<Vec<_>>();

        send_vendor_request(
            VENDOR,
            self.http_client
                .post(url)
                .bearer_auth(self.api_key.as_str())
                .json(&json!({ "records": records })),
        )
        .await
    }
}
