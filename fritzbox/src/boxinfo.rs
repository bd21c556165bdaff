//! The box's self description from `/cgi-bin/system_status`.
//!
//! The page body is a single `-` separated record:
//!
//! ```text
//! <model>-<annex>-<runtime>-<hash>-<status>-<connection>-<firmware>-<revision>-<branding>
//! FRITZ!Box 7590-B-1223030201-0A1B2C-000000-000000-154.07.29-104532-avm
//! ```
//!
//! `runtime` packs the reboot count followed by two digit hours, days, months and years. `firmware` is
//! `<image>.<major>.<minor>`. The model name may itself contain dashes, so fields are taken from the end.

use crate::error::{
    FritzError,
    Result,
};

pub(crate) const SYSTEM_STATUS_PATH: &str = "/cgi-bin/system_status";

const TRAILING_FIELDS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxInfo {
    pub model: Model,
    pub runtime: Runtime,
    pub firmware: FirmwareVersion,
    pub branding: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub annex: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Runtime {
    pub hours: u32,
    pub days: u32,
    pub months: u32,
    pub years: u32,
    pub reboots: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareVersion {
    pub image: String,
    pub os_version_major: String,
    pub os_version_minor: String,
    pub os_version_revision: String,
}

impl BoxInfo {
    pub fn parse(page: &str) -> Result<Self> {
        let record = strip_html(page);
        let malformed = || FritzError::MalformedBoxInfo(record.to_string());

        let tokens: Vec<&str> = record.split('-').collect();
        if tokens.len() <= TRAILING_FIELDS {
            return Err(malformed());
        }
        let (name, fields) = tokens.split_at(tokens.len() - TRAILING_FIELDS);
        let name = name.join("-");
        if name.trim().is_empty() {
            return Err(malformed());
        }

        let runtime = Runtime::parse(fields[1]).ok_or_else(malformed)?;
        let mut firmware = fields[5].splitn(3, '.');
        let (Some(image), Some(major), Some(minor)) = (firmware.next(), firmware.next(), firmware.next()) else {
            return Err(malformed());
        };

        Ok(Self {
            model: Model {
                name: name.trim().to_string(),
                annex: fields[0].to_string(),
            },
            runtime,
            firmware: FirmwareVersion {
                image: image.to_string(),
                os_version_major: major.to_string(),
                os_version_minor: minor.to_string(),
                os_version_revision: fields[6].to_string(),
            },
            branding: fields[7].trim().to_string(),
        })
    }
}

impl Runtime {
    fn parse(encoded: &str) -> Option<Self> {
        if encoded.len() < 8 || !encoded.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let (reboots, packed) = encoded.split_at(encoded.len() - 8);
        let two_digits = |at: usize| packed[at..at + 2].parse::<u32>().ok();
        Some(Self {
            hours: two_digits(0)?,
            days: two_digits(2)?,
            months: two_digits(4)?,
            years: two_digits(6)?,
            reboots: if reboots.is_empty() { 0 } else { reboots.parse().ok()? },
        })
    }
}

fn strip_html(page: &str) -> &str {
    let page = page.trim();
    let body = match (page.find("<body>"), page.rfind("</body>")) {
        (Some(start), Some(end)) if start + "<body>".len() <= end => &page[start + "<body>".len()..end],
        _ => page,
    };
    body.trim()
}
