use clap::{Parser, ValueEnum};
use scragle::{QualityTier, Result, ScrapeError, SearchSession, SinkTarget};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "scragle")]
#[command(about = "Scrape image search results and store them locally or in Google Cloud Storage")]
#[command(version)]
pub struct Args {
    /// Maximum number of images to save
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: u64,

    /// Keep grid thumbnails (low) or open each result for its larger image (sd)
    #[arg(long, value_enum, default_value_t = QualityArg::Low)]
    pub imagequality: QualityArg,

    /// Where images are stored
    #[arg(long, value_enum, default_value_t = OutArg::Folder)]
    pub out: OutArg,

    /// Service account credentials file (required with --out gcs)
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Bucket name (required with --out gcs)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Search results page URL; prompted for when omitted
    #[arg(long)]
    pub url: Option<String>,

    /// Class name of the thumbnail elements; prompted for when omitted
    #[arg(long)]
    pub thumbnail_class: Option<String>,

    /// Class name of the larger image in the detail view (sd only); prompted for when omitted
    #[arg(long)]
    pub modal_class: Option<String>,

    /// Folder for saved images and upload staging
    #[arg(long)]
    pub images_dir: Option<PathBuf>,

    /// Save images at their fetched size even in sd mode
    #[arg(long)]
    pub no_upscale: bool,

    /// JSON configuration file for the browser and pacing
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Read results from a saved HTML page instead of a live browser
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Low,
    Sd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutArg {
    Folder,
    Gcs,
}

impl From<QualityArg> for QualityTier {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => QualityTier::Low,
            QualityArg::Sd => QualityTier::Standard,
        }
    }
}

impl Args {
    /// Resolve the output flags to a sink target
    pub fn sink_target(&self, images_dir: &Path) -> Result<SinkTarget> {
        match self.out {
            OutArg::Folder => Ok(SinkTarget::LocalFolder {
                path: images_dir.to_path_buf(),
            }),
            OutArg::Gcs => match (&self.credentials, &self.bucket) {
                (Some(credentials), Some(bucket)) => Ok(SinkTarget::ObjectStore {
                    credentials: credentials.clone(),
                    bucket: bucket.clone(),
                }),
                _ => Err(ScrapeError::InvalidInput(
                    "credentials and bucket must be specified when using gcs as out parameter"
                        .to_string(),
                )),
            },
        }
    }

    /// Build the session, calling `prompt` for each value missing from the flags
    ///
    /// Output flags are checked before anything is asked for.
    pub fn session<P>(&self, images_dir: &Path, mut prompt: P) -> Result<SearchSession>
    where
        P: FnMut(&str) -> Result<String>,
    {
        let sink = self.sink_target(images_dir)?;
        let quality = QualityTier::from(self.imagequality);

        let mut value_or_prompt = |value: &Option<String>, question: &str| match value {
            Some(value) => Ok(value.clone()),
            None => prompt(question),
        };

        let url = value_or_prompt(&self.url, "Paste the Google Search Images result URL")?;
        let thumbnail_class = value_or_prompt(
            &self.thumbnail_class,
            "Paste the class name for the small thumbnail elements",
        )?;

        let mut builder = SearchSession::builder()
            .url(url)
            .count(self.count as usize)
            .quality(quality)
            .sink(sink)
            .thumbnail_class(thumbnail_class);
        if quality == QualityTier::Standard {
            let modal_class = value_or_prompt(
                &self.modal_class,
                "Paste the class name for the modal image element",
            )?;
            builder = builder.modal_class(modal_class);
        }
        if self.no_upscale {
            builder = builder.upscale(false);
        }
        builder.build()
    }
}
