//! Parsed source-record vocabulary
//!
//! One `CompanyRecord` is one `<SUBJECT>` element of the registry export,
//! flattened into the fixed node-path vocabulary the converter consumes.
//! All values are the raw element texts; normalization (lower-casing,
//! number/date parsing) belongs to the converter.

use serde::{Deserialize, Serialize};

/// One company record from the full registry export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub edrpou: Option<String>,
    pub address: Option<String>,
    /// Legal form (OPF element)
    pub company_type: Option<String>,
    /// Registry state (STAN element)
    pub status: Option<String>,
    /// Governing bylaw reference (STATUTE element)
    pub bylaw: Option<String>,
    pub founding_document_number: Option<String>,
    pub contact_info: Option<String>,
    pub vp_dates: Option<String>,
    pub executive_power: Option<String>,
    pub superior_management: Option<String>,
    pub managing_paper: Option<String>,
    pub terminated_info: Option<String>,
    pub termination_cancel_info: Option<String>,
    /// Raw capital text, comma as the decimal separator
    pub authorized_capital: Option<String>,
    /// Registration date and details packed into one string
    pub registration: Option<String>,
    pub current_authority: Option<String>,

    pub activity_kinds: Vec<ActivityKindItem>,
    /// Raw founder free-text lines
    pub founders: Vec<String>,
    /// Raw beneficiary free-text lines
    pub beneficiaries: Vec<String>,
    /// Raw signer names
    pub signers: Vec<String>,
    pub assignees: Vec<AssigneeItem>,
    pub predecessors: Vec<PredecessorItem>,
    pub exchange_data: Vec<ExchangeDataItem>,

    /// Present only when the section carries an OP_DATE; absence on a
    /// later import retracts the stored event.
    pub termination_started: Option<TerminationStartedSection>,
    /// Same presence rule as `termination_started`
    pub bankruptcy_readjustment: Option<BankruptcySection>,
}

impl CompanyRecord {
    /// Composite code joining a record to its eventually-assigned company
    /// identity within one batch: lower-cased name + EDRPOU.
    ///
    /// Returns `None` when the record has no EDRPOU, in which case the
    /// whole record is skipped.
    pub fn record_code(&self) -> Option<String> {
        let edrpou = self.edrpou.as_deref()?.trim();
        if edrpou.is_empty() {
            return None;
        }
        let name = self
            .name
            .as_deref()
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        Some(format!("{name}{edrpou}"))
    }
}

/// ACTIVITY_KINDS child item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityKindItem {
    pub code: Option<String>,
    pub name: Option<String>,
    /// PRIMARY element text; the registry writes "так" for the primary code
    pub primary: Option<String>,
}

impl ActivityKindItem {
    pub fn is_primary(&self) -> bool {
        self.primary.as_deref() == Some("так")
    }
}

/// ASSIGNEES child item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssigneeItem {
    pub name: Option<String>,
    pub edrpou: Option<String>,
}

/// PREDECESSORS child item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredecessorItem {
    pub name: Option<String>,
    pub edrpou: Option<String>,
}

/// EXCHANGE_DATA child item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeDataItem {
    pub authority_name: Option<String>,
    pub taxpayer_type: Option<String>,
    pub start_date: Option<String>,
    pub start_number: Option<String>,
    pub end_date: Option<String>,
    pub end_number: Option<String>,
}

/// TERMINATION_STARTED_INFO section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminationStartedSection {
    pub op_date: Option<String>,
    pub reason: Option<String>,
    pub sbj_state: Option<String>,
    pub signer_name: Option<String>,
    pub creditor_req_end_date: Option<String>,
}

/// BANKRUPTCY_READJUSTMENT_INFO section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankruptcySection {
    pub op_date: Option<String>,
    pub reason: Option<String>,
    pub sbj_state: Option<String>,
    pub head_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_code_requires_edrpou() {
        let mut record = CompanyRecord {
            name: Some("ТОВ РОМАШКА".into()),
            ..Default::default()
        };
        assert_eq!(record.record_code(), None);

        record.edrpou = Some("12345678".into());
        assert_eq!(record.record_code().as_deref(), Some("тов ромашка12345678"));
    }

    #[test]
    fn test_record_code_tolerates_missing_name() {
        let record = CompanyRecord {
            edrpou: Some("00000001".into()),
            ..Default::default()
        };
        assert_eq!(record.record_code().as_deref(), Some("00000001"));
    }
}
