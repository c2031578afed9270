//! Free-text field extractors for founder and beneficiary records
//!
//! The registry packs name, EDRPOU, address and equity into single
//! comma- or semicolon-delimited strings with no fixed schema. These
//! extractors pull the structured attributes back out. Anomalies are
//! logged and worked around, never raised: a bad line must not abort the
//! record, let alone the batch.

use bigdecimal::BigDecimal;
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Prefix marking a founder line as the ultimate beneficial owner
pub const BENEFICIARY_PREFIX: &str = "КІНЦЕВИЙ БЕНЕФІЦІАРНИЙ ВЛАСНИК";

const EQUITY_PHRASE_PREFIX: &str = "розмір внеску до статутного фонду";
const EQUITY_PHRASE_SUFFIX: &str = "грн.";
const EQUITY_SHARE_PREFIX: &str = "розмір частки";

/// Residue shorter than this many characters is separator noise, not an
/// address
const MIN_ADDRESS_CHARS: usize = 15;
/// Addresses over this many characters are suspicious but kept
const MAX_ADDRESS_CHARS: usize = 200;

fn edrpou_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{8}$").unwrap())
}

fn dot_decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+").unwrap())
}

fn comma_decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+,\d+").unwrap())
}

/// True when a token looks like an EDRPOU registry number
pub fn is_edrpou_token(token: &str) -> bool {
    edrpou_re().is_match(token.trim())
}

/// Structured attributes of a detailed founder line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFounderData {
    pub name: Option<String>,
    pub edrpou: Option<String>,
    pub address: Option<String>,
    pub equity: Option<BigDecimal>,
}

/// Structured attributes of a short founder line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FounderData {
    pub name: String,
    pub is_beneficiary: bool,
    pub address: Option<String>,
    pub equity: Option<BigDecimal>,
}

/// Structured attributes of a beneficiary line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeneficiaryData {
    pub name: String,
    pub country: Option<String>,
    pub address: Option<String>,
}

/// Extract name, EDRPOU, address and equity from a detailed founder line.
///
/// The line is comma-split; normally the second token is the EDRPOU. When
/// the name itself contains commas the number ends up further along, so
/// every token is scanned as a fallback and the anomaly is logged. Equity
/// sits in a fixed contribution phrase; whatever text remains after
/// removing name, number and equity is the address.
pub fn extract_detail_founder_data(founder_info: &str) -> DetailFounderData {
    let tokens: Vec<&str> = founder_info.split(',').map(str::trim).collect();
    let mut name = tokens.first().copied().unwrap_or_default().to_string();

    let mut edrpou = tokens
        .get(1)
        .copied()
        .filter(|t| is_edrpou_token(t))
        .map(str::to_string);
    if edrpou.is_none() {
        for token in &tokens {
            if is_edrpou_token(token) {
                edrpou = Some((*token).to_string());
                // the name itself contained commas; keep everything before
                // the number as the name
                if let Some(prefix) = founder_info.split(token).next() {
                    name = prefix.trim_end_matches([',', ' ']).to_string();
                }
                log::warn!("Нестандартний запис: {founder_info}");
                break;
            }
        }
    }

    let mut equity = None;
    let mut equity_element = None;
    for token in &tokens {
        if token.starts_with(EQUITY_PHRASE_PREFIX) && token.ends_with(EQUITY_PHRASE_SUFFIX) {
            if let Some(m) = dot_decimal_re().find(token) {
                equity = BigDecimal::from_str(m.as_str()).ok();
            }
            equity_element = Some((*token).to_string());
            break;
        }
    }

    let mut address = founder_info.replace(&name, "");
    if let Some(ref code) = edrpou {
        address = address.replace(code, "");
    }
    if let Some(ref element) = equity_element {
        address = address.replace(element, "");
    }
    let address_chars = address.chars().count();
    let address = if address.is_empty() || address_chars < MIN_ADDRESS_CHARS {
        None
    } else {
        if address_chars > MAX_ADDRESS_CHARS {
            log::warn!("Завелика адреса: {address} із запису: {founder_info}");
        }
        Some(address)
    };

    DetailFounderData {
        name: Some(name.to_lowercase()),
        edrpou,
        address,
        equity,
    }
}

/// Extract name, beneficiary flag, address and equity from a short founder
/// line.
///
/// Only the first comma splits the line: the equity clause itself contains
/// commas. A remainder opening with the share phrase parses as a
/// comma-decimal number; anything else is the address.
pub fn extract_founder_data(founder_info: &str) -> FounderData {
    let mut parts = founder_info.splitn(2, ',');
    let raw_name = parts.next().unwrap_or_default().trim();
    let is_beneficiary = raw_name.starts_with(BENEFICIARY_PREFIX);
    let name = raw_name.to_lowercase();

    let mut address = None;
    let mut equity = None;
    if let Some(second_part) = parts.next().map(str::trim) {
        if second_part.starts_with(EQUITY_SHARE_PREFIX) {
            match comma_decimal_re().find(second_part) {
                Some(m) => {
                    equity = BigDecimal::from_str(&m.as_str().replace(',', ".")).ok();
                }
                None => {
                    log::warn!("Запис без числового розміру частки: {founder_info}");
                }
            }
        } else {
            address = Some(second_part.to_string());
        }
    }

    FounderData {
        name,
        is_beneficiary,
        address,
        equity,
    }
}

/// Extract name, country and address from a beneficiary line.
///
/// Semicolons separate the three parts; with fewer than three the whole
/// trimmed line is the name and country/address stay unset.
pub fn extract_beneficiary_data(beneficiary_info: &str) -> BeneficiaryData {
    let parts: Vec<&str> = beneficiary_info.splitn(3, ';').map(str::trim).collect();
    if parts.len() == 3 {
        BeneficiaryData {
            name: parts[0].to_lowercase(),
            country: Some(parts[1].to_lowercase()),
            address: Some(parts[2].to_string()),
        }
    } else {
        BeneficiaryData {
            name: beneficiary_info.trim().to_lowercase(),
            country: None,
            address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_founder_plain_record() {
        let data = extract_detail_founder_data(
            "Іванов Іван Іванович, 12345678, розмір внеску до статутного фонду 100.50 грн.",
        );
        assert_eq!(data.name.as_deref(), Some("іванов іван іванович"));
        assert_eq!(data.edrpou.as_deref(), Some("12345678"));
        assert_eq!(data.equity, BigDecimal::from_str("100.50").ok());
        // residue is separator noise, under the address threshold
        assert_eq!(data.address, None);
    }

    #[test]
    fn test_detail_founder_name_with_commas() {
        // the EDRPOU is not the second token; the fallback scan finds it
        let data = extract_detail_founder_data(
            "ТОВАРИСТВО З ОБМЕЖЕНОЮ ВІДПОВІДАЛЬНІСТЮ \"РОГИ, КОПИТА\", 87654321, \
             розмір внеску до статутного фонду 5000.00 грн.",
        );
        assert_eq!(data.edrpou.as_deref(), Some("87654321"));
        assert_eq!(
            data.name.as_deref(),
            Some("товариство з обмеженою відповідальністю \"роги, копита\"")
        );
        assert_eq!(data.equity, BigDecimal::from_str("5000.00").ok());
    }

    #[test]
    fn test_detail_founder_edrpou_anywhere_is_recovered() {
        for info in [
            "Назва, 11112222, м. Київ, вулиця Банкова, будинок 1",
            "Назва, з комою, 11112222, м. Київ, вулиця Банкова, будинок 1",
        ] {
            let data = extract_detail_founder_data(info);
            assert_eq!(data.edrpou.as_deref(), Some("11112222"), "input: {info}");
            assert!(
                !data.name.clone().unwrap_or_default().contains("11112222"),
                "input: {info}"
            );
        }
    }

    #[test]
    fn test_detail_founder_keeps_long_address() {
        let data = extract_detail_founder_data(
            "Петренко Петро Петрович, 11223344, м. Київ, вулиця Хрещатик, будинок 22, квартира 5",
        );
        let address = data.address.expect("address survives the threshold");
        assert!(address.contains("Хрещатик"));
        assert!(!address.contains("11223344"));
    }

    #[test]
    fn test_founder_data_with_equity_share() {
        let data = extract_founder_data(
            "КІНЦЕВИЙ БЕНЕФІЦІАРНИЙ ВЛАСНИК ІВАНОВ ІВАН, розмір частки 50,25 відсотків",
        );
        assert!(data.is_beneficiary);
        assert_eq!(data.name, "кінцевий бенефіціарний власник іванов іван");
        assert_eq!(data.equity, BigDecimal::from_str("50.25").ok());
        assert_eq!(data.address, None);
    }

    #[test]
    fn test_founder_data_with_address_remainder() {
        let data = extract_founder_data("Сидоренко Олена, м. Одеса, вул. Дерибасівська 10");
        assert!(!data.is_beneficiary);
        assert_eq!(data.name, "сидоренко олена");
        assert_eq!(data.equity, None);
        assert_eq!(data.address.as_deref(), Some("м. Одеса, вул. Дерибасівська 10"));
    }

    #[test]
    fn test_beneficiary_three_parts() {
        let data = extract_beneficiary_data("ІВАНОВ ІВАН; УКРАЇНА; м. Київ, вул. Банкова 1");
        assert_eq!(data.name, "іванов іван");
        assert_eq!(data.country.as_deref(), Some("україна"));
        assert_eq!(data.address.as_deref(), Some("м. Київ, вул. Банкова 1"));
    }

    #[test]
    fn test_beneficiary_short_form_is_all_name() {
        for info in ["ІВАНОВ ІВАН", "ІВАНОВ ІВАН; УКРАЇНА"] {
            let data = extract_beneficiary_data(info);
            assert_eq!(data.name, info.to_lowercase());
            assert_eq!(data.country, None, "input: {info}");
            assert_eq!(data.address, None, "input: {info}");
        }
    }

    #[test]
    fn test_is_edrpou_token() {
        assert!(is_edrpou_token("12345678"));
        assert!(is_edrpou_token(" 12345678 "));
        assert!(!is_edrpou_token("1234567"));
        assert!(!is_edrpou_token("123456789"));
        assert!(!is_edrpou_token("1234567a"));
    }
}
