//! Entity model for the business registry
//!
//! Rows mirror the registry's company table and its satellite collections.
//! Every row is soft-deletable (`deleted_at`) and carries history-tracking
//! timestamps. `id` and `company_id` stay `None` while a row is staged for
//! bulk insert and the owning company's identity is not yet known.
//!
//! The `merge_*` methods are the field comparators the reconciler uses: they
//! copy changed values from an incoming row onto the stored one and return
//! the list of changed field names (plus `updated_at` when anything changed),
//! so storage can restrict the write to those columns.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Company row, identified by the composite natural key `code`
/// (lower-cased name + EDRPOU).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: Option<Uuid>,
    /// Composite natural key: lower-cased name + EDRPOU
    pub code: String,
    pub name: Option<String>,
    pub short_name: Option<String>,
    /// Legal form (OPF), lower-cased
    pub company_type: Option<String>,
    pub edrpou: String,
    pub address: Option<String>,
    pub authorized_capital: Option<BigDecimal>,
    /// Registry state (STAN), lower-cased
    pub status: Option<String>,
    pub bylaw_id: Option<Uuid>,
    pub registration_date: Option<NaiveDate>,
    pub registration_info: Option<String>,
    pub contact_info: Option<String>,
    pub authority_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Company {
    pub fn new(code: String, edrpou: String) -> Self {
        let ts = now();
        Self {
            id: None,
            code,
            name: None,
            short_name: None,
            company_type: None,
            edrpou,
            address: None,
            authorized_capital: None,
            status: None,
            bylaw_id: None,
            registration_date: None,
            registration_info: None,
            contact_info: None,
            authority_id: None,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    /// Diff every mutable field against `incoming`, copying changed values
    /// and returning the changed field names.
    pub fn merge_from(&mut self, incoming: &Company) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.name != incoming.name {
            self.name = incoming.name.clone();
            changed.push("name");
        }
        if self.short_name != incoming.short_name {
            self.short_name = incoming.short_name.clone();
            changed.push("short_name");
        }
        if self.company_type != incoming.company_type {
            self.company_type = incoming.company_type.clone();
            changed.push("company_type");
        }
        if self.authorized_capital != incoming.authorized_capital {
            self.authorized_capital = incoming.authorized_capital.clone();
            changed.push("authorized_capital");
        }
        if self.address != incoming.address {
            self.address = incoming.address.clone();
            changed.push("address");
        }
        if self.status != incoming.status {
            self.status = incoming.status.clone();
            changed.push("status");
        }
        if self.bylaw_id != incoming.bylaw_id {
            self.bylaw_id = incoming.bylaw_id;
            changed.push("bylaw");
        }
        if self.registration_date != incoming.registration_date {
            self.registration_date = incoming.registration_date;
            changed.push("registration_date");
        }
        if self.registration_info != incoming.registration_info {
            self.registration_info = incoming.registration_info.clone();
            changed.push("registration_info");
        }
        if self.contact_info != incoming.contact_info {
            self.contact_info = incoming.contact_info.clone();
            changed.push("contact_info");
        }
        if self.authority_id != incoming.authority_id {
            self.authority_id = incoming.authority_id;
            changed.push("authority");
        }
        if !changed.is_empty() {
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }
}

/// Founder row; beneficiary records land in the same table with
/// `is_beneficiary` set, merged onto a founder when the name matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Founder {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    /// Lower-cased name, the matching key within a company
    pub name: Option<String>,
    pub edrpou: Option<String>,
    pub address: Option<String>,
    pub equity: Option<BigDecimal>,
    pub is_founder: bool,
    pub is_beneficiary: bool,
    /// Raw founder free-text source field
    pub info: Option<String>,
    /// Raw beneficiary free-text source field
    pub info_beneficiary: Option<String>,
    /// Lower-cased country of a beneficiary
    pub country: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Founder {
    fn blank() -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            name: None,
            edrpou: None,
            address: None,
            equity: None,
            is_founder: false,
            is_beneficiary: false,
            info: None,
            info_beneficiary: None,
            country: None,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    pub fn founder(
        info: String,
        name: Option<String>,
        edrpou: Option<String>,
        address: Option<String>,
        equity: Option<BigDecimal>,
        is_beneficiary: bool,
    ) -> Self {
        Self {
            name,
            edrpou,
            address,
            equity,
            is_founder: true,
            is_beneficiary,
            info: Some(info),
            ..Self::blank()
        }
    }

    pub fn beneficiary(
        info: String,
        name: Option<String>,
        country: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            name,
            country,
            address,
            is_beneficiary: true,
            info_beneficiary: Some(info),
            ..Self::blank()
        }
    }

    /// Upgrade a staged founder in place when a beneficiary record with the
    /// same name arrives in the same pass.
    pub fn upgrade_to_beneficiary(
        &mut self,
        info: String,
        country: Option<String>,
        address: Option<String>,
    ) {
        self.is_beneficiary = true;
        self.info_beneficiary = Some(info);
        self.country = country;
        self.address = address;
    }

    /// Founder-pass comparator. The whole update is gated on the raw source
    /// field differing; address and equity only overwrite when the incoming
    /// record actually carries a value.
    pub fn merge_founder(&mut self, incoming: &Founder) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.info != incoming.info {
            self.info = incoming.info.clone();
            changed.push("info");
            if self.is_beneficiary != incoming.is_beneficiary {
                self.is_beneficiary = incoming.is_beneficiary;
                changed.push("is_beneficiary");
            }
            if incoming.address.is_some() && self.address != incoming.address {
                self.address = incoming.address.clone();
                changed.push("address");
            }
            if incoming.equity.is_some() && self.equity != incoming.equity {
                self.equity = incoming.equity.clone();
                changed.push("equity");
            }
        }
        if !changed.is_empty() {
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }

    /// Beneficiary-pass comparator, gated on the raw beneficiary field
    /// differing. Never clears the beneficiary flag.
    pub fn merge_beneficiary(&mut self, incoming: &Founder) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.info_beneficiary != incoming.info_beneficiary {
            self.info_beneficiary = incoming.info_beneficiary.clone();
            changed.push("info_beneficiary");
            if !self.is_beneficiary {
                self.is_beneficiary = true;
                changed.push("is_beneficiary");
            }
            if incoming.address.is_some() && self.address != incoming.address {
                self.address = incoming.address.clone();
                changed.push("address");
            }
            if self.country != incoming.country {
                self.country = incoming.country.clone();
                changed.push("country");
            }
        }
        if !changed.is_empty() {
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }
}

/// Maximum stored length of a signer name, in characters
pub const SIGNER_NAME_MAX_CHARS: usize = 389;

/// Signer row. The name is the identity; nothing is mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signer {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Signer {
    pub fn new(name: String) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            name,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }
}

/// Assignee row, matched by name + EDRPOU; nothing is mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub name: Option<String>,
    pub edrpou: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Assignee {
    pub fn new(name: Option<String>, edrpou: Option<String>) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            name,
            edrpou,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }
}

/// Link row between a company and a shared KVED classification code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyToKved {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub kved_id: Uuid,
    pub primary_kved: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl CompanyToKved {
    pub fn new(kved_id: Uuid, primary_kved: bool) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            kved_id,
            primary_kved,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    pub fn merge_from(&mut self, incoming: &CompanyToKved) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.primary_kved != incoming.primary_kved {
            self.primary_kved = incoming.primary_kved;
            changed.push("primary_kved");
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }
}

/// Link row between a company and a shared predecessor entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyToPredecessor {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub predecessor_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl CompanyToPredecessor {
    pub fn new(predecessor_id: Uuid) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            predecessor_id,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }
}

/// Tax-exchange registration row, matched by authority + start date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeDataCompany {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub authority_id: Uuid,
    pub taxpayer_type_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub start_number: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub end_number: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl ExchangeDataCompany {
    pub fn new(authority_id: Uuid) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            authority_id,
            taxpayer_type_id: None,
            start_date: None,
            start_number: None,
            end_date: None,
            end_number: None,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    pub fn merge_from(&mut self, incoming: &ExchangeDataCompany) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.start_number != incoming.start_number {
            self.start_number = incoming.start_number.clone();
            changed.push("start_number");
        }
        if self.taxpayer_type_id != incoming.taxpayer_type_id {
            self.taxpayer_type_id = incoming.taxpayer_type_id;
            changed.push("taxpayer_type");
        }
        if self.end_date != incoming.end_date {
            self.end_date = incoming.end_date;
            changed.push("end_date");
        }
        if self.end_number != incoming.end_number {
            self.end_number = incoming.end_number.clone();
            changed.push("end_number");
        }
        if !changed.is_empty() {
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }
}

/// At-most-one-per-company detail row for long free-text attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub founding_document_number: Option<String>,
    pub executive_power: Option<String>,
    pub superior_management: Option<String>,
    pub managing_paper: Option<String>,
    pub terminated_info: Option<String>,
    pub termination_cancel_info: Option<String>,
    pub vp_dates: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl CompanyDetail {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        founding_document_number: Option<String>,
        executive_power: Option<String>,
        superior_management: Option<String>,
        managing_paper: Option<String>,
        terminated_info: Option<String>,
        termination_cancel_info: Option<String>,
        vp_dates: Option<String>,
    ) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            founding_document_number,
            executive_power,
            superior_management,
            managing_paper,
            terminated_info,
            termination_cancel_info,
            vp_dates,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    pub fn merge_from(&mut self, incoming: &CompanyDetail) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.founding_document_number != incoming.founding_document_number {
            self.founding_document_number = incoming.founding_document_number.clone();
            changed.push("founding_document_number");
        }
        if self.executive_power != incoming.executive_power {
            self.executive_power = incoming.executive_power.clone();
            changed.push("executive_power");
        }
        if self.superior_management != incoming.superior_management {
            self.superior_management = incoming.superior_management.clone();
            changed.push("superior_management");
        }
        if self.managing_paper != incoming.managing_paper {
            self.managing_paper = incoming.managing_paper.clone();
            changed.push("managing_paper");
        }
        if self.terminated_info != incoming.terminated_info {
            self.terminated_info = incoming.terminated_info.clone();
            changed.push("terminated_info");
        }
        if self.termination_cancel_info != incoming.termination_cancel_info {
            self.termination_cancel_info = incoming.termination_cancel_info.clone();
            changed.push("termination_cancel_info");
        }
        if self.vp_dates != incoming.vp_dates {
            self.vp_dates = incoming.vp_dates.clone();
            changed.push("vp_dates");
        }
        if !changed.is_empty() {
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }
}

/// Fallback for a missing creditor-claim deadline in termination records
pub fn creditor_req_end_date_fallback() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

/// At-most-one-per-company termination event; retracted upstream sections
/// soft-delete the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationStarted {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub op_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub sbj_state: Option<String>,
    pub signer_name: Option<String>,
    pub creditor_req_end_date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl TerminationStarted {
    pub fn new(
        op_date: Option<NaiveDate>,
        reason: Option<String>,
        sbj_state: Option<String>,
        signer_name: Option<String>,
        creditor_req_end_date: NaiveDate,
    ) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            op_date,
            reason,
            sbj_state,
            signer_name,
            creditor_req_end_date,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    pub fn merge_from(&mut self, incoming: &TerminationStarted) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.op_date != incoming.op_date {
            self.op_date = incoming.op_date;
            changed.push("op_date");
        }
        if self.reason != incoming.reason {
            self.reason = incoming.reason.clone();
            changed.push("reason");
        }
        if self.sbj_state != incoming.sbj_state {
            self.sbj_state = incoming.sbj_state.clone();
            changed.push("sbj_state");
        }
        if self.signer_name != incoming.signer_name {
            self.signer_name = incoming.signer_name.clone();
            changed.push("signer_name");
        }
        if self.creditor_req_end_date != incoming.creditor_req_end_date {
            self.creditor_req_end_date = incoming.creditor_req_end_date;
            changed.push("creditor_req_end_date");
        }
        if !changed.is_empty() {
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }
}

/// At-most-one-per-company bankruptcy-readjustment event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BancruptcyReadjustment {
    pub id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub op_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub sbj_state: Option<String>,
    pub head_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl BancruptcyReadjustment {
    pub fn new(
        op_date: Option<NaiveDate>,
        reason: Option<String>,
        sbj_state: Option<String>,
        head_name: Option<String>,
    ) -> Self {
        let ts = now();
        Self {
            id: None,
            company_id: None,
            op_date,
            reason,
            sbj_state,
            head_name,
            created_at: ts,
            updated_at: ts,
            deleted_at: None,
        }
    }

    pub fn merge_from(&mut self, incoming: &BancruptcyReadjustment) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.op_date != incoming.op_date {
            self.op_date = incoming.op_date;
            changed.push("op_date");
        }
        if self.reason != incoming.reason {
            self.reason = incoming.reason.clone();
            changed.push("reason");
        }
        if self.sbj_state != incoming.sbj_state {
            self.sbj_state = incoming.sbj_state.clone();
            changed.push("sbj_state");
        }
        if self.head_name != incoming.head_name {
            self.head_name = incoming.head_name.clone();
            changed.push("head_name");
        }
        if !changed.is_empty() {
            self.updated_at = now();
            changed.push("updated_at");
        }
        changed
    }
}

// Shared reference entities, globally deduplicated by natural key and
// created eagerly (not batched) so their identities are available to the
// rows that link to them.

/// Constitutive-document type governing a company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bylaw {
    pub id: Uuid,
    pub name: String,
}

/// Predecessor legal entity, deduplicated by name (a same-named entry with
/// a different EDRPOU yields a fresh row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predecessor {
    pub id: Uuid,
    pub name: String,
    pub edrpou: Option<String>,
}

/// Supervising or registration authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub id: Uuid,
    pub name: String,
}

/// Taxpayer type from the exchange section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerType {
    pub id: Uuid,
    pub name: String,
}

/// KVED economic-activity classification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvedCode {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_company_merge_reports_changed_fields() {
        let mut stored = Company::new("тов ромашка12345678".into(), "12345678".into());
        stored.name = Some("тов ромашка".into());
        stored.status = Some("зареєстровано".into());

        let mut incoming = stored.clone();
        incoming.status = Some("припинено".into());
        incoming.address = Some("м. Київ".into());

        let changed = stored.merge_from(&incoming);
        assert_eq!(changed, vec!["address", "status", "updated_at"]);
        assert_eq!(stored.status.as_deref(), Some("припинено"));

        // identical rows produce no write
        let unchanged = stored.clone();
        assert!(stored.merge_from(&unchanged).is_empty());
    }

    #[test]
    fn test_founder_merge_is_gated_on_info() {
        let mut stored = Founder::founder(
            "Іванов Іван, 100 грн.".into(),
            Some("іванов іван".into()),
            None,
            None,
            Some(BigDecimal::from_str("100.00").unwrap()),
            false,
        );
        // differing equity alone does not trigger an update while the raw
        // source field is identical
        let mut incoming = stored.clone();
        incoming.equity = Some(BigDecimal::from_str("200.00").unwrap());
        assert!(stored.merge_founder(&incoming).is_empty());

        incoming.info = Some("Іванов Іван, 200 грн.".into());
        let changed = stored.merge_founder(&incoming);
        assert!(changed.contains(&"info"));
        assert!(changed.contains(&"equity"));
        assert_eq!(stored.equity, incoming.equity);
    }

    #[test]
    fn test_founder_merge_keeps_address_when_incoming_is_empty() {
        let mut stored = Founder::founder(
            "запис".into(),
            Some("назва".into()),
            None,
            Some("вул. Хрещатик, 1, м. Київ".into()),
            None,
            false,
        );
        let mut incoming = stored.clone();
        incoming.info = Some("новий запис".into());
        incoming.address = None;

        let changed = stored.merge_founder(&incoming);
        assert_eq!(changed, vec!["info", "updated_at"]);
        assert!(stored.address.is_some());
    }

    #[test]
    fn test_beneficiary_merge_sets_flag_once() {
        let mut stored = Founder::founder(
            "запис".into(),
            Some("петренко петро".into()),
            None,
            None,
            None,
            false,
        );
        let incoming = Founder::beneficiary(
            "ПЕТРЕНКО ПЕТРО; україна; м. Львів".into(),
            Some("петренко петро".into()),
            Some("україна".into()),
            Some("м. Львів".into()),
        );
        let changed = stored.merge_beneficiary(&incoming);
        assert!(changed.contains(&"is_beneficiary"));
        assert!(changed.contains(&"country"));
        assert!(stored.is_beneficiary);
        // founder flag untouched by the beneficiary pass
        assert!(stored.is_founder);
    }
}
