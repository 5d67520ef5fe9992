use crate::classify::InlineEncoding;
use crate::error::{Result, ScrapeError};
use crate::utils;
use async_trait::async_trait;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::time::Duration;

/// Page markup does not always pad its payloads
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36";

/// Output format of a fetched image, as used for its file extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Other(String),
}

impl ImageFormat {
    /// Infer the format from a `Content-Type` header value
    ///
    /// A missing header defaults to jpeg, and webp is labeled jpeg without transcoding.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return ImageFormat::Jpeg;
        };
        if content_type.contains("webp") {
            return ImageFormat::Jpeg;
        }

        let mime = content_type.split(';').next().unwrap_or_default().trim();
        let subtype = mime.rsplit('/').next().unwrap_or_default().to_ascii_lowercase();
        match subtype.as_str() {
            "" | "jpeg" | "jpg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            other => ImageFormat::Other(other.to_string()),
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Other(ext) => ext,
        }
    }
}

impl From<InlineEncoding> for ImageFormat {
    fn from(encoding: InlineEncoding) -> Self {
        match encoding {
            InlineEncoding::Jpeg => ImageFormat::Jpeg,
            InlineEncoding::Png => ImageFormat::Png,
        }
    }
}

/// Decoded or downloaded image bytes, ready for persisting
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub filename: String,
}

impl FetchedImage {
    /// Name the bytes after the alt text with a unique suffix
    pub fn new(bytes: Vec<u8>, format: ImageFormat, alt: &str) -> Self {
        let filename = utils::unique_filename(alt, format.extension());
        Self {
            bytes,
            format,
            filename,
        }
    }
}

/// Minimal response data needed from an HTTP GET
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of remote image bytes
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// [`ImageFetcher`] sending the headers of a desktop browser
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.8"),
    );
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers
}

#[async_trait]
impl ImageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Decode an inline base64 payload
pub fn decode_inline(encoding: InlineEncoding, payload: &str, alt: &str) -> Result<FetchedImage> {
    let cleaned = payload
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    let bytes = LENIENT_BASE64.decode(cleaned)?;
    Ok(FetchedImage::new(bytes, encoding.into(), alt))
}

/// Download a remote image; a non-success status is a [`ScrapeError::Fetch`]
pub async fn fetch_remote<F>(fetcher: &F, url: &str, alt: &str) -> Result<FetchedImage>
where
    F: ImageFetcher + ?Sized,
{
    let response = fetcher.get(url).await?;
    if !response.is_success() {
        return Err(ScrapeError::Fetch {
            url: url.to_string(),
            status: response.status,
        });
    }

    ::log::debug!(
        "Content-Type: {:?}, status code: {}",
        response.content_type,
        response.status
    );
    let format = ImageFormat::from_content_type(response.content_type.as_deref());
    Ok(FetchedImage::new(response.body, format, alt))
}
