//! Sentinel-1 SAFE product names.
//!
//! ```text
//! S1A_IW_GRDH_1SDV_20190704T053012_20190704T053037_027980_0328C9_5B1B.SAFE
//! MMM_BB_TTTR_LFPP_YYYYMMDDTHHMMSS_YYYYMMDDTHHMMSS_OOOOOO_DDDDDD_CCCC
//! ```

use std::sync::{Arc, LazyLock};

use dsnorm_core::{GetterTable, TableUnit};
use dsnorm_model::{ExtractError, FieldName, FieldValue, RawMetadata};
use dsnorm_time::{Anchor, Interval, TimeRule};
use dsnorm_vocab::VocabularyResolver;
use regex::Regex;

use crate::common::{basename, coverage_from_url, require_url, url};

pub const NAME: &str = "sentinel1_safe";

static SAFE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<mission>S1[ABCD])_
        (?P<mode>IW|EW|SM|WV|S[1-6])_
        (?P<product>GRD|SLC|OCN|RAW)(?P<resolution>[FHM_])_
        (?P<level>[0-2])(?P<class>[SA])(?P<polarisation>SH|SV|DH|DV|HH|HV|VV|VH)_
        \d{8}T\d{6}_\d{8}T\d{6}_
        (?P<orbit>\d{6})_",
    )
    .expect("Invalid Sentinel-1 SAFE regex")
});

const STAMP: &str = r"(?P<year>\d{4})(?P<month>\d{2})(?P<day>\d{2})T(?P<hour>\d{2})(?P<minute>\d{2})(?P<second>\d{2})";

static START_RULES: LazyLock<Vec<TimeRule>> = LazyLock::new(|| {
    vec![
        TimeRule::new(
            "sentinel1-start",
            &format!(r"S1[ABCD]_\w{{2}}_\w{{4}}_\w{{4}}_{STAMP}_"),
            Anchor::YearMonthDay,
            Interval::Instant,
        )
        .expect("Invalid Sentinel-1 start rule"),
    ]
});

static STOP_RULES: LazyLock<Vec<TimeRule>> = LazyLock::new(|| {
    vec![
        TimeRule::new(
            "sentinel1-stop",
            &format!(r"S1[ABCD]_\w{{2}}_\w{{4}}_\w{{4}}_\d{{8}}T\d{{6}}_{STAMP}_"),
            Anchor::YearMonthDay,
            Interval::Instant,
        )
        .expect("Invalid Sentinel-1 stop rule"),
    ]
});

/// Canonical platform keyword for a mission code.
fn platform_keyword(mission: &str) -> String {
    format!("Sentinel-1{}", &mission[2..])
}

fn safe_name(raw: &RawMetadata) -> Result<regex::Captures<'_>, ExtractError> {
    let name = basename(require_url(raw)?);
    SAFE_NAME
        .captures(name)
        .ok_or_else(|| ExtractError::invalid(format!("'{name}' is not a Sentinel-1 SAFE name")))
}

fn entry_id(raw: &RawMetadata) -> Result<Option<FieldValue>, ExtractError> {
    safe_name(raw)?;
    let name = basename(require_url(raw)?);
    let id = name
        .trim_end_matches(".zip")
        .trim_end_matches(".SAFE");
    Ok(Some(id.into()))
}

fn title(raw: &RawMetadata) -> Result<Option<FieldValue>, ExtractError> {
    let caps = safe_name(raw)?;
    let mission = &caps["mission"];
    Ok(Some(
        format!(
            "{} {} {} level {} product",
            platform_keyword(mission),
            &caps["mode"],
            &caps["product"],
            &caps["level"]
        )
        .into(),
    ))
}

/// Unit recognizing Sentinel-1 products by their SAFE name.
pub fn unit(resolver: Arc<VocabularyResolver>) -> TableUnit {
    let platforms = resolver.clone();
    let instruments = resolver.clone();
    let providers = resolver.clone();
    let parameters = resolver;

    let getters = GetterTable::new()
        .with(FieldName::EntryId, entry_id)
        .with(FieldName::EntryTitle, title)
        .with(FieldName::TimeCoverageStart, |raw: &RawMetadata| {
            Ok(coverage_from_url(raw, &START_RULES)?.0)
        })
        .with(FieldName::TimeCoverageEnd, |raw: &RawMetadata| {
            Ok(coverage_from_url(raw, &STOP_RULES)?.0)
        })
        .with(FieldName::Platform, move |raw: &RawMetadata| {
            let caps = safe_name(raw)?;
            let keyword = platform_keyword(&caps["mission"]);
            Ok(Some(platforms.resolve_platform(&keyword, &["Sentinel-1"])?.into()))
        })
        .with(FieldName::Instrument, move |raw: &RawMetadata| {
            safe_name(raw)?;
            Ok(Some(instruments.resolve_instrument("SAR-C SAR", &["SENTINEL-1"])?.into()))
        })
        .with(FieldName::Provider, move |raw: &RawMetadata| {
            safe_name(raw)?;
            Ok(Some(
                providers
                    .resolve_provider(&["ESA/EO", "https://dataspace.copernicus.eu"])?
                    .into(),
            ))
        })
        .with(FieldName::DatasetParameters, move |raw: &RawMetadata| {
            safe_name(raw)?;
            let term = parameters
                .resolve_parameter("surface_backwards_scattering_coefficient_of_radar_wave")?;
            Ok(Some(term.into()))
        });

    TableUnit::new(NAME, getters)
        .with_description("Sentinel-1 SAFE product names")
        .with_predicate(|raw: &RawMetadata| {
            url(raw).is_some_and(|url| SAFE_NAME.is_match(basename(url)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsnorm_core::{NormalizerUnit, extract_field};
    use dsnorm_vocab::VocabularyCatalog;
    use serde_json::json;

    const URL: &str = "https://dataspace.example.org/S1A_IW_GRDH_1SDV_20190704T053012_20190704T053037_027980_0328C9_5B1B.SAFE";

    fn sentinel1() -> TableUnit {
        let catalog = VocabularyCatalog::builtin().unwrap();
        unit(Arc::new(VocabularyResolver::new(Arc::new(catalog))))
    }

    fn raw(url: &str) -> RawMetadata {
        RawMetadata::from_value(json!({ "url": url })).unwrap()
    }

    fn term_name(value: Option<FieldValue>) -> Option<String> {
        value
            .as_ref()
            .and_then(FieldValue::as_term)
            .map(|term| term.short_name().to_string())
    }

    #[test]
    fn recognizes_safe_names() {
        let unit = sentinel1();
        assert!(unit.applies(&raw(URL)));
        assert!(unit.applies(&raw(&format!("{URL}/"))));
        assert!(!unit.applies(&raw("https://host/S2A_MSIL1C_20190704T053012.SAFE")));
    }

    #[test]
    fn extracts_identity_and_vocabulary() {
        let unit = sentinel1();
        let input = raw(URL);
        assert_eq!(
            extract_field(&unit, FieldName::EntryId, &input).unwrap(),
            Some(FieldValue::text(
                "S1A_IW_GRDH_1SDV_20190704T053012_20190704T053037_027980_0328C9_5B1B"
            ))
        );
        assert_eq!(
            term_name(extract_field(&unit, FieldName::Platform, &input).unwrap()),
            Some("Sentinel-1A".to_string())
        );
        assert_eq!(
            term_name(extract_field(&unit, FieldName::Instrument, &input).unwrap()),
            Some("SENTINEL-1 C-SAR".to_string())
        );
        assert_eq!(
            term_name(extract_field(&unit, FieldName::Provider, &input).unwrap()),
            Some("ESA/EO".to_string())
        );
    }

    #[test]
    fn start_and_stop_come_from_their_own_stamps() {
        let unit = sentinel1();
        let input = raw(URL);
        let start = extract_field(&unit, FieldName::TimeCoverageStart, &input).unwrap();
        let stop = extract_field(&unit, FieldName::TimeCoverageEnd, &input).unwrap();
        assert_eq!(start.map(|v| v.to_string()), Some("2019-07-04T05:30:12Z".to_string()));
        assert_eq!(stop.map(|v| v.to_string()), Some("2019-07-04T05:30:37Z".to_string()));
    }
}
