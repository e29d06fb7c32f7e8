//! University of Bremen ASI sea ice concentration from AMSR2.
//!
//! Daily files are named `asi-AMSR2-n6250-20240101-v5.4.nc`, monthly means
//! `asi-AMSR2-s6250-202401-v5.4.nc`. The hemisphere letter selects the grid.

use std::sync::{Arc, LazyLock};

use dsnorm_core::{GetterTable, TableUnit};
use dsnorm_model::{ExtractError, FieldName, FieldValue, RawMetadata};
use dsnorm_time::{Anchor, Interval, TimeRule};
use dsnorm_vocab::VocabularyResolver;
use regex::Regex;

use crate::common::{basename, bounding_box_wkt, coverage_from_url, file_stem, require_url, url};

pub const NAME: &str = "amsr2_asi";

const PROVIDER_URL: &str = "https://seaice.uni-bremen.de/";

static ASI_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^asi-AMSR2-(?P<hemisphere>[ns])6250-(?P<period>\d{6}|\d{8})-v(?P<version>[\d.]+)\.nc$")
        .expect("Invalid ASI file name regex")
});

static RULES: LazyLock<Vec<TimeRule>> = LazyLock::new(|| {
    vec![
        TimeRule::new(
            "asi-daily",
            r"asi-AMSR2-[ns]6250-(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2})-",
            Anchor::YearMonthDay,
            Interval::Day,
        )
        .expect("Invalid ASI daily rule"),
        TimeRule::new(
            "asi-monthly",
            r"asi-AMSR2-[ns]6250-(?P<year>\d{4})(?P<month>\d{2})-",
            Anchor::YearMonth,
            Interval::Month,
        )
        .expect("Invalid ASI monthly rule"),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    fn label(self) -> &'static str {
        match self {
            Hemisphere::North => "Arctic",
            Hemisphere::South => "Antarctic",
        }
    }

    fn location(self) -> &'static str {
        match self {
            Hemisphere::North => "ARCTIC",
            Hemisphere::South => "SOUTHERN OCEAN",
        }
    }

    /// Extent of the 6.25 km polar stereographic grid.
    fn geometry(self) -> String {
        match self {
            Hemisphere::North => bounding_box_wkt(-180.0, 30.0, 180.0, 90.0),
            Hemisphere::South => bounding_box_wkt(-180.0, -90.0, 180.0, -40.0),
        }
    }
}

struct AsiFile<'a> {
    hemisphere: Hemisphere,
    daily: bool,
    version: &'a str,
}

fn asi_file(raw: &RawMetadata) -> Result<AsiFile<'_>, ExtractError> {
    let name = basename(require_url(raw)?);
    let caps = ASI_NAME
        .captures(name)
        .ok_or_else(|| ExtractError::invalid(format!("'{name}' is not an ASI AMSR2 file name")))?;
    let hemisphere = if &caps["hemisphere"] == "n" {
        Hemisphere::North
    } else {
        Hemisphere::South
    };
    Ok(AsiFile {
        hemisphere,
        daily: caps["period"].len() == 8,
        version: caps.name("version").map_or("", |m| m.as_str()),
    })
}

fn title(raw: &RawMetadata) -> Result<Option<FieldValue>, ExtractError> {
    let file = asi_file(raw)?;
    let cadence = if file.daily { "daily" } else { "monthly" };
    Ok(Some(
        format!(
            "ASI AMSR2 {} sea ice concentration, {} 6.25 km grid (v{})",
            cadence,
            file.hemisphere.label(),
            file.version
        )
        .into(),
    ))
}

fn summary(raw: &RawMetadata) -> Result<Option<FieldValue>, ExtractError> {
    let file = asi_file(raw)?;
    Ok(Some(
        format!(
            "Sea ice concentration over the {} retrieved with the ARTIST Sea Ice (ASI) \
             algorithm from 89 GHz AMSR2 brightness temperatures.",
            file.hemisphere.label()
        )
        .into(),
    ))
}

/// Unit recognizing ASI AMSR2 sea ice concentration files.
pub fn unit(resolver: Arc<VocabularyResolver>) -> TableUnit {
    let platforms = resolver.clone();
    let instruments = resolver.clone();
    let providers = resolver.clone();
    let parameters = resolver.clone();
    let locations = resolver.clone();
    let topics = resolver;

    let getters = GetterTable::new()
        .with(FieldName::EntryId, |raw: &RawMetadata| {
            asi_file(raw)?;
            Ok(Some(file_stem(require_url(raw)?).into()))
        })
        .with(FieldName::EntryTitle, title)
        .with(FieldName::Summary, summary)
        .with(FieldName::TimeCoverageStart, |raw: &RawMetadata| {
            Ok(coverage_from_url(raw, &RULES)?.0)
        })
        .with(FieldName::TimeCoverageEnd, |raw: &RawMetadata| {
            Ok(coverage_from_url(raw, &RULES)?.1)
        })
        .with(FieldName::Platform, move |raw: &RawMetadata| {
            asi_file(raw)?;
            Ok(Some(platforms.resolve_platform("GCOM-W1", &[])?.into()))
        })
        .with(FieldName::Instrument, move |raw: &RawMetadata| {
            asi_file(raw)?;
            Ok(Some(instruments.resolve_instrument("AMSR2", &["GCOM-W1"])?.into()))
        })
        .with(FieldName::Provider, move |raw: &RawMetadata| {
            asi_file(raw)?;
            Ok(Some(providers.resolve_provider(&["UNI-BREMEN/IUP", PROVIDER_URL])?.into()))
        })
        .with(FieldName::LocationGeometry, |raw: &RawMetadata| {
            Ok(Some(asi_file(raw)?.hemisphere.geometry().into()))
        })
        .with(FieldName::GcmdLocation, move |raw: &RawMetadata| {
            let location = asi_file(raw)?.hemisphere.location();
            Ok(Some(locations.resolve_location(location)?.into()))
        })
        .with(FieldName::IsoTopicCategory, move |raw: &RawMetadata| {
            asi_file(raw)?;
            Ok(Some(topics.resolve_iso_topic_category("Oceans")?.into()))
        })
        .with(FieldName::DatasetParameters, move |raw: &RawMetadata| {
            asi_file(raw)?;
            let term = parameters.resolve_parameter("sea_ice_area_fraction")?;
            Ok(Some(term.into()))
        });

    TableUnit::new(NAME, getters)
        .with_description("ASI AMSR2 sea ice concentration (University of Bremen)")
        .with_predicate(|raw: &RawMetadata| {
            url(raw).is_some_and(|url| ASI_NAME.is_match(basename(url)))
        })
}
