//! Google Sheets integration for the gym progression tracker.
//!
//! Fetches the raw workout grid over the Sheets values API and keeps a
//! time-bounded in-memory copy so repeated requests do not hammer the API.
//! The cache is an explicit object owned by the caller; this crate holds no
//! process-wide state.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Default request timeout for Sheets API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// A raw rectangular grid of sheet cells, row-major.
pub type Grid = Vec<Vec<Value>>;

/// Sheets client errors.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// The provided access token was invalid.
    #[error("invalid access token: {reason}")]
    InvalidToken { reason: &'static str },
    /// The provided spreadsheet ID was invalid.
    #[error("invalid spreadsheet ID: {reason}")]
    InvalidSpreadsheetId { reason: String },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("Sheets API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The spreadsheet contains no sheets at all.
    #[error("spreadsheet has no sheets")]
    NoSheets,
}

/// Time-bounded cache of the raw sheet grid.
///
/// Created at process start and passed into [`SheetsClient::fetch_grid`];
/// expired data is kept around so a failed refresh can still serve the last
/// known grid.
#[derive(Debug)]
pub struct SheetCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    fetched_at: Instant,
    grid: Grid,
}

impl SheetCache {
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Returns the cached grid while it is still fresh.
    pub fn get(&self) -> Option<&Grid> {
        match &self.entry {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(&entry.grid),
            _ => None,
        }
    }

    /// Returns the cached grid regardless of age, for fallback after a
    /// failed refresh.
    pub fn stale(&self) -> Option<&Grid> {
        self.entry.as_ref().map(|entry| &entry.grid)
    }

    /// True when the cache holds no fresh data.
    pub fn is_expired(&self) -> bool {
        self.get().is_none()
    }

    pub fn put(&mut self, grid: Grid) {
        self.entry = Some(CacheEntry {
            fetched_at: Instant::now(),
            grid,
        });
    }
}

/// Google Sheets values API client.
///
/// Authenticates with a pre-issued OAuth access token; obtaining and
/// refreshing the token is the caller's concern.
pub struct SheetsClient {
    http: reqwest::Client,
    base: Url,
    access_token: String,
}

impl fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetsClient")
            .field("base", &self.base.as_str())
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SheetsClient {
    /// Creates a new client for one spreadsheet.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, the
    /// spreadsheet ID is empty, or the HTTP client fails to build.
    pub fn new(
        spreadsheet_id: impl AsRef<str>,
        access_token: impl Into<String>,
    ) -> Result<Self, SheetsError> {
        let access_token = access_token.into();
        if access_token.is_empty() {
            return Err(SheetsError::InvalidToken {
                reason: "access token cannot be empty",
            });
        }
        if access_token.trim().is_empty() {
            return Err(SheetsError::InvalidToken {
                reason: "access token cannot be whitespace-only",
            });
        }

        let spreadsheet_id = spreadsheet_id.as_ref();
        if spreadsheet_id.trim().is_empty() {
            return Err(SheetsError::InvalidSpreadsheetId {
                reason: "spreadsheet ID cannot be empty".to_string(),
            });
        }
        let base = Url::parse(&format!("{SHEETS_API_BASE}/{spreadsheet_id}")).map_err(|err| {
            SheetsError::InvalidSpreadsheetId {
                reason: err.to_string(),
            }
        })?;

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(SheetsError::ClientBuild)?;

        Ok(Self {
            http,
            base,
            access_token,
        })
    }

    /// Fetches the grid for `sheet!columns`, going through the cache.
    ///
    /// Fresh cached data short-circuits the request entirely. When the fetch
    /// fails and expired data exists, the stale grid is served with a
    /// warning, matching the behavior users see from the original sheet
    /// backend during API hiccups.
    pub async fn fetch_grid(
        &self,
        sheet: &str,
        columns: &str,
        cache: &mut SheetCache,
    ) -> Result<Grid, SheetsError> {
        if let Some(grid) = cache.get() {
            tracing::debug!("serving sheet data from cache");
            return Ok(grid.clone());
        }

        match self.fetch_uncached(sheet, columns).await {
            Ok(grid) => {
                cache.put(grid.clone());
                Ok(grid)
            }
            Err(err) => {
                if let Some(grid) = cache.stale() {
                    tracing::warn!(error = %err, "sheet fetch failed, serving expired cache");
                    return Ok(grid.clone());
                }
                Err(err)
            }
        }
    }

    async fn fetch_uncached(&self, sheet: &str, columns: &str) -> Result<Grid, SheetsError> {
        // The metadata check is best-effort: when it fails we still try the
        // configured sheet directly.
        let sheet = match self.resolve_sheet(sheet).await {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(error = %err, "sheet metadata check failed, trying configured sheet");
                sheet.to_string()
            }
        };

        let range = format!("{sheet}!{columns}");
        let rows = self.fetch_values(&range).await?;
        tracing::debug!(sheet = %sheet, rows = rows.len(), "fetched sheet data");
        Ok(rows)
    }

    /// Fetches one A1 range of values.
    pub async fn fetch_values(&self, range: &str) -> Result<Grid, SheetsError> {
        let body = self.get_text(self.values_url(range)).await?;
        let payload: ValueRange = serde_json::from_str(&body)
            .map_err(|err| SheetsError::InvalidResponse(err.to_string()))?;
        Ok(payload.values)
    }

    /// Lists the spreadsheet's sheet titles from its metadata.
    pub async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        let body = self.get_text(self.base.clone()).await?;
        let payload: SpreadsheetMetadata = serde_json::from_str(&body)
            .map_err(|err| SheetsError::InvalidResponse(err.to_string()))?;
        Ok(payload
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    /// Picks the sheet to read: the requested one when it exists, otherwise
    /// the first available sheet.
    async fn resolve_sheet(&self, requested: &str) -> Result<String, SheetsError> {
        let titles = self.sheet_titles().await?;
        if titles.iter().any(|title| title == requested) {
            return Ok(requested.to_string());
        }

        let Some(first) = titles.into_iter().next() else {
            return Err(SheetsError::NoSheets);
        };
        tracing::warn!(
            requested,
            fallback = %first,
            "configured sheet not found, using first available sheet"
        );
        Ok(first)
    }

    async fn get_text(&self, url: Url) -> Result<String, SheetsError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &body));
        }
        Ok(body)
    }

    fn values_url(&self, range: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.push("values").push(range);
        }
        url
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Grid,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Maps an error body to [`SheetsError::Api`], preferring the message from
/// the Google error envelope when one is present.
fn parse_api_error(status: u16, body: &str) -> SheetsError {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    let message = serde_json::from_str::<ErrorPayload>(body)
        .map_or_else(|_| body.to_string(), |payload| payload.error.message);
    SheetsError::Api { status, message }
}
