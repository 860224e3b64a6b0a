use std::{fmt, sync::Arc, time::Duration};

use bytes::Bytes;
use log::Log;
use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};
use url::Url;

use crate::logging::{NopLogger, debug_to, error_to};
use crate::payload::{
    AuthRequest, CreateResponse, Credentials, PingResponse, RecordsResponse, Status,
};
use crate::record::{NameTypeUpdate, Record, RecordType};
use crate::{ClientBuilderError, ClientError, Context, RequestError, ServerError, SslBundle};

/// The endpoint used when none is given.
pub const DEFAULT_ENDPOINT: &str = "https://api.porkbun.com/api/json/v3/";

/// The HTTP timeout used when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const NO_PAYLOAD: Option<&()> = None;

/// Builder for a [Client] that handles default values.
pub struct ClientBuilder {
    endpoint: Option<Url>,
    apikey: Option<String>,
    secretapikey: Option<String>,
    timeout: Duration,
    logger: Option<Arc<dyn Log>>,
    client: Option<reqwest::Client>,
}

impl ClientBuilder {
    fn new() -> Self {
        Self {
            endpoint: None,
            apikey: None,
            secretapikey: None,
            timeout: DEFAULT_TIMEOUT,
            logger: None,
            client: None,
        }
    }

    /// Sets the API endpoint to the one given.
    ///
    /// Paths for the individual calls are appended to the endpoint's path.
    pub fn endpoint(mut self, endpoint: &Url) -> Self {
        self.endpoint = Some(endpoint.clone());
        self
    }

    /// In the case that `endpoint` is the Some variant, sets the API endpoint to it.
    pub fn endpoint_if_some(mut self, endpoint: Option<&Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint.clone());
        }
        self
    }

    /// Sets the API key to the one given.
    pub fn apikey(mut self, apikey: &str) -> Self {
        self.apikey = Some(apikey.to_string());
        self
    }

    /// Sets the secret API key to the one given.
    pub fn secretapikey(mut self, secretapikey: &str) -> Self {
        self.secretapikey = Some(secretapikey.to_string());
        self
    }

    /// Sets the timeout for each HTTP request. Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the logger the client writes its diagnostics to.
    ///
    /// Defaults to [`NopLogger`].
    pub fn logger(mut self, logger: Arc<dyn Log>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Uses the given HTTP client instead of a fresh one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds a [Client] from the builder.
    ///
    /// In the case that no API endpoint is set, [`DEFAULT_ENDPOINT`] is used.
    ///
    /// # Errors
    /// - `MissingField` if a required field isn't added to the builder.
    /// - `UrlParse` if the default API endpoint fails to parse. This shouldn't happen.
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => DEFAULT_ENDPOINT.parse()?,
        };
        let apikey = self
            .apikey
            .ok_or_else(|| ClientBuilderError::MissingField("apikey".to_string()))?;
        let secretapikey = self
            .secretapikey
            .ok_or_else(|| ClientBuilderError::MissingField("secretapikey".to_string()))?;

        Ok(Client {
            endpoint,
            credentials: Credentials::new(&apikey, &secretapikey),
            timeout: self.timeout,
            logger: self.logger.unwrap_or_else(|| Arc::new(NopLogger)),
            client: self.client.unwrap_or_default(),
        })
    }
}

/// API client.
///
/// Each call is a single POST to the API. Nothing is retried or cached.
pub struct Client {
    endpoint: Url,
    credentials: Credentials,
    timeout: Duration,
    logger: Arc<dyn Log>,
    client: reqwest::Client,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint.as_str())
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new Client for the default endpoint.
    ///
    /// # Errors
    /// - `UrlParse` if the default API endpoint fails to parse. This shouldn't happen.
    pub fn new(apikey: &str, secretapikey: &str) -> Result<Self, ClientBuilderError> {
        Self::builder()
            .apikey(apikey)
            .secretapikey(secretapikey)
            .build()
    }

    /// Returns a builder for a Client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.endpoint
    }

    pub fn set_base_url(&mut self, endpoint: Url) {
        self.endpoint = endpoint;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn logger(&self) -> &Arc<dyn Log> {
        &self.logger
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Log>) {
        self.logger = logger;
    }

    /// Creates a [Url] from the endpoint and the path segments.
    ///
    /// Each segment is percent-encoded, so a `/` inside one stays inside it.
    fn build_url(&self, path: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| RequestError::CannotBeABase(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// Sends an authenticated POST request to `endpoint` and returns the raw
    /// response body.
    ///
    /// The API keys are merged into `payload`, which must therefore serialize
    /// to a JSON object. Only a `200 OK` response counts as a success; its
    /// body is returned as-is.
    ///
    /// # Errors
    /// - `Serialization` if `payload` can't be turned into a JSON object.
    /// - `Request` if `endpoint` isn't a valid URL.
    /// - `Transport` if the request fails, times out, or `ctx` ends first.
    /// - `Server` for any status other than `200 OK`.
    pub async fn do_request<T>(
        &self,
        ctx: &Context,
        endpoint: &str,
        payload: Option<&T>,
    ) -> Result<Bytes, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let logger = &*self.logger;

        let request = AuthRequest::new(&self.credentials, payload);
        let body = serde_json::to_vec(&request).map_err(|e| {
            error_to!(logger, "failed to marshal request body: {e}");
            ClientError::Serialization(e)
        })?;

        let request = Url::parse(endpoint)
            .map_err(RequestError::from)
            .and_then(|url| {
                self.client
                    .post(url)
                    .timeout(self.timeout)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
                    .build()
                    .map_err(RequestError::from)
            })
            .map_err(|e| {
                error_to!(logger, "failed to create request: {e}");
                ClientError::Request(e)
            })?;

        let (status, body) = ctx.run(self.execute(request)).await.map_err(|e| {
            error_to!(logger, "failed to call API: {e}");
            ClientError::Transport(e)
        })?;
        debug_to!(
            logger,
            "response: status={status} body={}",
            String::from_utf8_lossy(&body)
        );

        if status != StatusCode::OK {
            error_to!(
                logger,
                "server error: status={status} body={}",
                String::from_utf8_lossy(&body)
            );
            return Err(ClientError::Server(ServerError::from_response(status, &body)));
        }

        Ok(body)
    }

    /// Sends the request and reads the whole body.
    async fn execute(
        &self,
        request: reqwest::Request,
    ) -> Result<(StatusCode, Bytes), reqwest::Error> {
        let resp = self.client.execute(request).await?;
        debug_to!(&*self.logger, "resp: {resp:?}");
        let status = resp.status();
        let body = resp.bytes().await?;

        Ok((status, body))
    }

    /// Decodes a response body, turning a failure status into an error.
    ///
    /// The status is checked before the rest of the body, as failed calls
    /// leave out the fields a successful one would have.
    fn decode<R: DeserializeOwned>(&self, body: &[u8]) -> Result<R, ClientError> {
        let decode_error = |e: serde_json::Error| {
            error_to!(&*self.logger, "failed to unmarshal response: {e}");
            ClientError::Decode(e)
        };

        serde_json::from_slice::<Status>(body)
            .map_err(decode_error)?
            .into_result()
            .inspect_err(|e| debug_to!(&*self.logger, "API returned {e}"))?;

        serde_json::from_slice(body).map_err(decode_error)
    }

    /// Calls the endpoint at `path` and decodes the response.
    async fn call<T, R>(
        &self,
        ctx: &Context,
        path: &[&str],
        payload: Option<&T>,
    ) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(path).map_err(|e| {
            error_to!(&*self.logger, "failed to create request: {e}");
            ClientError::Request(e)
        })?;
        let body = self.do_request(ctx, url.as_str(), payload).await?;
        self.decode(&body)
    }

    /// Calls the endpoint that tests if the authorization is correct.
    ///
    /// Returns the caller's public IP address as reported by the API.
    pub async fn ping(&self, ctx: &Context) -> Result<String, ClientError> {
        let resp: PingResponse = self.call(ctx, &["ping"], NO_PAYLOAD).await?;
        Ok(resp.your_ip)
    }

    /// Creates a DNS record on `domain`, returning the ID the API assigned to it.
    ///
    /// `record.name` is the subdomain, leave it unset for the root domain. The
    /// record's `id` is ignored by the API.
    pub async fn create_record(
        &self,
        ctx: &Context,
        domain: &str,
        record: &Record,
    ) -> Result<i64, ClientError> {
        let resp: CreateResponse = self
            .call(ctx, &["dns", "create", domain], Some(record))
            .await?;
        Ok(resp.id)
    }

    /// Replaces the DNS record with the given ID.
    pub async fn edit_record(
        &self,
        ctx: &Context,
        domain: &str,
        id: i64,
        record: &Record,
    ) -> Result<(), ClientError> {
        let _: IgnoredAny = self
            .call(ctx, &["dns", "edit", domain, &id.to_string()], Some(record))
            .await?;
        Ok(())
    }

    /// Edits every record on `domain` with the given type and subdomain.
    ///
    /// A `subdomain` of `None` or `""` targets records on the root domain.
    pub async fn edit_records_by_name_type(
        &self,
        ctx: &Context,
        domain: &str,
        type_: RecordType,
        subdomain: Option<&str>,
        update: &NameTypeUpdate,
    ) -> Result<(), ClientError> {
        let path = name_type_path("editByNameType", domain, type_, subdomain);
        let _: IgnoredAny = self.call(ctx, &path, Some(update)).await?;
        Ok(())
    }

    /// Deletes the DNS record with the given ID.
    pub async fn delete_record(
        &self,
        ctx: &Context,
        domain: &str,
        id: i64,
    ) -> Result<(), ClientError> {
        let _: IgnoredAny = self
            .call(ctx, &["dns", "delete", domain, &id.to_string()], NO_PAYLOAD)
            .await?;
        Ok(())
    }

    /// Deletes every record on `domain` with the given type and subdomain.
    pub async fn delete_records_by_name_type(
        &self,
        ctx: &Context,
        domain: &str,
        type_: RecordType,
        subdomain: Option<&str>,
    ) -> Result<(), ClientError> {
        let path = name_type_path("deleteByNameType", domain, type_, subdomain);
        let _: IgnoredAny = self.call(ctx, &path, NO_PAYLOAD).await?;
        Ok(())
    }

    /// Retrieves all editable DNS records on `domain`, in the order the API
    /// lists them.
    pub async fn retrieve_records(
        &self,
        ctx: &Context,
        domain: &str,
    ) -> Result<Vec<Record>, ClientError> {
        let resp: RecordsResponse = self
            .call(ctx, &["dns", "retrieve", domain], NO_PAYLOAD)
            .await?;
        Ok(resp.records)
    }

    /// Retrieves the DNS record with the given ID.
    ///
    /// The API answers with a list, which is empty if no such record exists.
    pub async fn retrieve_record(
        &self,
        ctx: &Context,
        domain: &str,
        id: i64,
    ) -> Result<Vec<Record>, ClientError> {
        let resp: RecordsResponse = self
            .call(ctx, &["dns", "retrieve", domain, &id.to_string()], NO_PAYLOAD)
            .await?;
        Ok(resp.records)
    }

    /// Retrieves every record on `domain` with the given type and subdomain.
    pub async fn retrieve_records_by_name_type(
        &self,
        ctx: &Context,
        domain: &str,
        type_: RecordType,
        subdomain: Option<&str>,
    ) -> Result<Vec<Record>, ClientError> {
        let path = name_type_path("retrieveByNameType", domain, type_, subdomain);
        let resp: RecordsResponse = self.call(ctx, &path, NO_PAYLOAD).await?;
        Ok(resp.records)
    }

    /// Retrieves the SSL certificate bundle for `domain`.
    pub async fn retrieve_ssl_bundle(
        &self,
        ctx: &Context,
        domain: &str,
    ) -> Result<SslBundle, ClientError> {
        self.call(ctx, &["ssl", "retrieve", domain], NO_PAYLOAD).await
    }
}

/// Path for the `*ByNameType` endpoints. Root records have no subdomain segment.
fn name_type_path<'a>(
    action: &'a str,
    domain: &'a str,
    type_: RecordType,
    subdomain: Option<&'a str>,
) -> Vec<&'a str> {
    let mut path = vec!["dns", action, domain, type_.as_str()];
    if let Some(subdomain) = subdomain.filter(|s| !s.is_empty()) {
        path.push(subdomain);
    }
    path
}
