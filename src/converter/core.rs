//! Converter engine orchestrating record reconciliation
//!
//! One converter owns a storage backend, a reference-data cache and a
//! write buffer for the duration of an import run. Records are processed
//! strictly in document order; a company seen for the first time is staged
//! for bulk insert together with its satellite rows (which wait in a
//! per-record pending arena until the company's identity is known), while
//! a known company is diffed field by field and each satellite collection
//! is reconciled against its persisted rows.

use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::converter::buffer::{WriteBuffer, DEFAULT_CHUNK_SIZE};
use crate::converter::diff::diff_collection;
use crate::converter::refdata::ReferenceCache;
use crate::extract::{extract_beneficiary_data, extract_detail_founder_data, extract_founder_data};
use crate::models::*;
use crate::record::{BankruptcySection, CompanyRecord, TerminationStartedSection};
use crate::traits::RegistryStorage;
use crate::types::{RegistryError, RegistryResult};
use crate::utils::text::{cut_first_word, first_word, is_absent, parse_registry_date,
    truncate_chars};

/// Satellite rows staged for a company that has no identity yet,
/// keyed in the converter by the record's composite code.
#[derive(Debug, Default)]
struct PendingSatellites {
    founders: Vec<Founder>,
    signers: Vec<Signer>,
    assignees: Vec<Assignee>,
    kved_links: Vec<CompanyToKved>,
    predecessor_links: Vec<CompanyToPredecessor>,
    exchange_data: Vec<ExchangeDataCompany>,
    detail: Option<CompanyDetail>,
    termination: Option<TerminationStarted>,
    bancruptcy: Option<BancruptcyReadjustment>,
}

/// Snapshot converter for the full company export
pub struct Converter<S: RegistryStorage> {
    storage: S,
    refdata: ReferenceCache,
    buffer: WriteBuffer,
    pending: HashMap<String, PendingSatellites>,
}

impl<S: RegistryStorage> Converter<S> {
    /// Create a converter with the default chunk size, warming the
    /// reference caches from current table contents.
    pub fn new(storage: S) -> RegistryResult<Self> {
        Self::with_chunk_size(storage, DEFAULT_CHUNK_SIZE)
    }

    /// Create a converter with an explicit bulk-flush threshold
    pub fn with_chunk_size(storage: S, chunk_size: usize) -> RegistryResult<Self> {
        let refdata = ReferenceCache::warm(&storage)?;
        Ok(Self {
            storage,
            refdata,
            buffer: WriteBuffer::new(chunk_size),
            pending: HashMap::new(),
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Reconcile one batch of parsed records against persisted state.
    ///
    /// Record-level failures are logged and skipped, never propagated: a
    /// bad record must not abort the batch. After the last record, staged
    /// companies are flushed first, deferred children are back-filled with
    /// the assigned identities, and every satellite queue is committed in
    /// dependency order.
    pub fn process_batch(&mut self, records: &[CompanyRecord]) -> RegistryResult<()> {
        for record in records {
            if let Err(err) = self.process_record(record) {
                log::warn!(
                    "запис {} пропущено: {err}",
                    record.edrpou.as_deref().unwrap_or("без коду")
                );
            }
        }
        self.flush()?;
        log::info!("оброблено записів: {}", records.len());
        Ok(())
    }

    fn process_record(&mut self, record: &CompanyRecord) -> RegistryResult<()> {
        // no registry number, no identity: skip silently
        let Some(code) = record.record_code() else {
            return Ok(());
        };

        let incoming = self.build_company_row(record, &code)?;
        match self.storage.find_company_by_code(&code)? {
            None => self.create_company(record, code, incoming),
            Some(stored) => self.update_company(record, stored, incoming),
        }
    }

    /// Extract and normalize the flat company attributes of a record
    fn build_company_row(
        &mut self,
        record: &CompanyRecord,
        code: &str,
    ) -> RegistryResult<Company> {
        let edrpou = record.edrpou.clone().unwrap_or_default();
        let mut company = Company::new(code.to_string(), edrpou);
        company.name = record.name.as_deref().map(str::to_lowercase);
        company.short_name = record.short_name.as_deref().map(str::to_lowercase);
        company.company_type = record.company_type.as_deref().map(str::to_lowercase);
        company.status = record.status.as_deref().map(str::to_lowercase);
        company.address = record.address.clone();
        company.contact_info = record.contact_info.clone();
        company.authorized_capital = record
            .authorized_capital
            .as_deref()
            .and_then(|raw| BigDecimal::from_str(&raw.replace(',', ".")).ok());
        if let Some(registration) = record.registration.as_deref() {
            company.registration_date = parse_registry_date(first_word(registration));
            let info = cut_first_word(registration);
            if !info.is_empty() {
                company.registration_info = Some(info.to_string());
            }
        }
        if let Some(bylaw) = record.bylaw.as_deref().filter(|s| !s.trim().is_empty()) {
            company.bylaw_id = Some(self.refdata.bylaw(&mut self.storage, bylaw)?.id);
        }
        if let Some(authority) = record
            .current_authority
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            company.authority_id = Some(self.refdata.authority(&mut self.storage, authority)?.id);
        }
        Ok(company)
    }

    // Create path: everything is staged; foreign keys wait for the flush.

    fn create_company(
        &mut self,
        record: &CompanyRecord,
        code: String,
        company: Company,
    ) -> RegistryResult<()> {
        let mut pending = PendingSatellites {
            detail: Some(self.build_company_detail(record)),
            ..Default::default()
        };

        for item in &record.activity_kinds {
            let Some(kved_name) = item.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let kved_code = item.code.as_deref().unwrap_or("");
            let kved = self.refdata.kved(&mut self.storage, kved_code, kved_name)?;
            pending
                .kved_links
                .push(CompanyToKved::new(kved.id, item.is_primary()));
        }

        for name in &record.signers {
            pending.signers.push(Signer::new(
                truncate_chars(name, SIGNER_NAME_MAX_CHARS).to_lowercase(),
            ));
        }

        if let Some(section) = &record.termination_started {
            pending.termination = Some(build_termination(section));
        }
        if let Some(section) = &record.bankruptcy_readjustment {
            pending.bancruptcy = Some(build_bancruptcy(section));
        }

        for item in &record.predecessors {
            let Some(name) = item.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let predecessor =
                self.refdata
                    .predecessor(&mut self.storage, name, item.edrpou.as_deref())?;
            pending
                .predecessor_links
                .push(CompanyToPredecessor::new(predecessor.id));
        }

        for item in &record.assignees {
            pending.assignees.push(Assignee::new(
                item.name.as_deref().map(str::to_lowercase),
                item.edrpou.clone(),
            ));
        }

        // only items carrying an authority name become rows; the rest of
        // the section is accumulated, not last-wins
        for item in &record.exchange_data {
            let Some(authority_name) = item.authority_name.as_deref().filter(|n| !n.is_empty())
            else {
                continue;
            };
            let authority = self.refdata.authority(&mut self.storage, authority_name)?;
            let mut row = ExchangeDataCompany::new(authority.id);
            if let Some(taxpayer_type) =
                item.taxpayer_type.as_deref().filter(|t| !t.is_empty())
            {
                row.taxpayer_type_id =
                    Some(self.refdata.taxpayer_type(&mut self.storage, taxpayer_type)?.id);
            }
            row.start_date = item.start_date.as_deref().and_then(parse_registry_date);
            row.start_number = item.start_number.clone();
            row.end_date = item.end_date.as_deref().and_then(parse_registry_date);
            row.end_number = item.end_number.clone();
            pending.exchange_data.push(row);
        }

        for info in &record.founders {
            if is_absent(info) {
                continue;
            }
            let row = if info.contains(',') {
                let data = extract_detail_founder_data(info);
                Founder::founder(
                    info.clone(),
                    data.name,
                    data.edrpou,
                    data.address,
                    data.equity,
                    false,
                )
            } else {
                Founder::founder(info.clone(), Some(info.to_lowercase()), None, None, None, false)
            };
            pending.founders.push(row);
        }

        // beneficiaries merge onto a staged founder with the same name
        // before the insert decision
        for info in &record.beneficiaries {
            let data = extract_beneficiary_data(info);
            let name = Some(data.name.clone());
            match pending.founders.iter_mut().find(|f| f.name == name) {
                Some(stored) => {
                    stored.upgrade_to_beneficiary(info.clone(), data.country, data.address);
                }
                None => {
                    pending.founders.push(Founder::beneficiary(
                        info.clone(),
                        name,
                        data.country,
                        data.address,
                    ));
                }
            }
        }

        self.pending.insert(code, pending);
        self.buffer.add_company(company, &mut self.storage)
    }

    // Update path: diff against persisted rows, satellite by satellite.

    fn update_company(
        &mut self,
        record: &CompanyRecord,
        mut stored: Company,
        incoming: Company,
    ) -> RegistryResult<()> {
        let changed = stored.merge_from(&incoming);
        if !changed.is_empty() {
            self.storage.save_company(&stored, &changed)?;
        }
        let company_id = stored.id.ok_or(RegistryError::MissingId("company"))?;

        self.update_company_detail(record, company_id)?;
        self.update_founders(record, company_id)?;
        self.update_kved_links(record, company_id)?;
        self.update_signers(record, company_id)?;
        self.update_termination_started(record, company_id)?;
        self.update_bancruptcy_readjustment(record, company_id)?;
        self.update_predecessor_links(record, company_id)?;
        self.update_assignees(record, company_id)?;
        self.update_exchange_data(record, company_id)?;
        self.update_beneficiaries(record, company_id)?;
        Ok(())
    }

    fn update_company_detail(
        &mut self,
        record: &CompanyRecord,
        company_id: Uuid,
    ) -> RegistryResult<()> {
        let incoming = self.build_company_detail(record);
        match self.storage.company_detail_of(company_id)? {
            Some(mut stored) => {
                let changed = stored.merge_from(&incoming);
                if !changed.is_empty() {
                    self.storage.save_company_detail(&stored, &changed)?;
                }
            }
            None => {
                let mut row = incoming;
                row.company_id = Some(company_id);
                self.buffer.add_company_detail(row, &mut self.storage)?;
            }
        }
        Ok(())
    }

    fn update_founders(&mut self, record: &CompanyRecord, company_id: Uuid) -> RegistryResult<()> {
        // beneficiary-only rows belong to the beneficiary pass and must not
        // be retired here
        let existing: Vec<Founder> = self
            .storage
            .founders_of(company_id)?
            .into_iter()
            .filter(|f| f.is_founder)
            .collect();
        let mut incoming = Vec::new();
        for info in &record.founders {
            if is_absent(info) {
                continue;
            }
            let row = if info.contains(',') {
                let data = extract_founder_data(info);
                Founder::founder(
                    info.clone(),
                    Some(data.name),
                    None,
                    data.address,
                    data.equity,
                    data.is_beneficiary,
                )
            } else {
                Founder::founder(info.clone(), Some(info.to_lowercase()), None, None, None, false)
            };
            incoming.push(row);
        }

        let plan = diff_collection(
            incoming,
            existing,
            |f: &Founder| f.name.clone(),
            |stored, item| stored.merge_founder(item),
        );
        for (row, changed) in &plan.to_save {
            self.storage.save_founder(row, changed)?;
        }
        for mut row in plan.to_create {
            row.company_id = Some(company_id);
            self.buffer.add_founder(row, &mut self.storage)?;
        }
        for row in plan.to_retire {
            let id = row.id.ok_or(RegistryError::MissingId("founder"))?;
            self.storage.soft_delete_founder(id)?;
        }
        Ok(())
    }

    /// Beneficiary pass over the shared founder table. Never retires rows;
    /// retirement is owned by the founders pass.
    fn update_beneficiaries(
        &mut self,
        record: &CompanyRecord,
        company_id: Uuid,
    ) -> RegistryResult<()> {
        if record.beneficiaries.is_empty() {
            return Ok(());
        }
        let mut existing = self.storage.founders_of(company_id)?;
        for info in &record.beneficiaries {
            let data = extract_beneficiary_data(info);
            let name = Some(data.name.clone());
            let incoming = Founder::beneficiary(
                info.clone(),
                name.clone(),
                data.country,
                data.address,
            );
            match existing.iter_mut().find(|f| f.name == name) {
                Some(stored) => {
                    let changed = stored.merge_beneficiary(&incoming);
                    if !changed.is_empty() {
                        self.storage.save_founder(stored, &changed)?;
                    }
                }
                None => {
                    let mut row = incoming;
                    row.company_id = Some(company_id);
                    self.buffer.add_founder(row, &mut self.storage)?;
                }
            }
        }
        Ok(())
    }

    fn update_kved_links(
        &mut self,
        record: &CompanyRecord,
        company_id: Uuid,
    ) -> RegistryResult<()> {
        let existing = self.storage.kved_links_of(company_id)?;
        let mut incoming = Vec::new();
        for item in &record.activity_kinds {
            let Some(kved_name) = item.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let kved_code = item.code.as_deref().unwrap_or("");
            let kved = self.refdata.kved(&mut self.storage, kved_code, kved_name)?;
            incoming.push(CompanyToKved::new(kved.id, item.is_primary()));
        }

        let plan = diff_collection(
            incoming,
            existing,
            |link: &CompanyToKved| link.kved_id,
            |stored, item| stored.merge_from(item),
        );
        for (row, changed) in &plan.to_save {
            self.storage.save_kved_link(row, changed)?;
        }
        for mut row in plan.to_create {
            row.company_id = Some(company_id);
            self.buffer.add_kved_link(row, &mut self.storage)?;
        }
        for row in plan.to_retire {
            let id = row.id.ok_or(RegistryError::MissingId("kved link"))?;
            self.storage.soft_delete_kved_link(id)?;
        }
        Ok(())
    }

    fn update_signers(&mut self, record: &CompanyRecord, company_id: Uuid) -> RegistryResult<()> {
        let existing = self.storage.signers_of(company_id)?;
        let incoming: Vec<Signer> = record
            .signers
            .iter()
            .map(|name| Signer::new(truncate_chars(name, SIGNER_NAME_MAX_CHARS).to_lowercase()))
            .collect();

        // the name is the whole identity; a changed name is a new signer
        let plan = diff_collection(
            incoming,
            existing,
            |s: &Signer| s.name.clone(),
            |_, _| Vec::new(),
        );
        for mut row in plan.to_create {
            row.company_id = Some(company_id);
            self.buffer.add_signer(row, &mut self.storage)?;
        }
        for row in plan.to_retire {
            let id = row.id.ok_or(RegistryError::MissingId("signer"))?;
            self.storage.soft_delete_signer(id)?;
        }
        Ok(())
    }

    fn update_assignees(&mut self, record: &CompanyRecord, company_id: Uuid) -> RegistryResult<()> {
        let existing = self.storage.assignees_of(company_id)?;
        let incoming: Vec<Assignee> = record
            .assignees
            .iter()
            .map(|item| {
                Assignee::new(
                    item.name.as_deref().map(str::to_lowercase),
                    item.edrpou.clone(),
                )
            })
            .collect();

        let plan = diff_collection(
            incoming,
            existing,
            |a: &Assignee| (a.name.clone(), a.edrpou.clone()),
            |_, _| Vec::new(),
        );
        for mut row in plan.to_create {
            row.company_id = Some(company_id);
            self.buffer.add_assignee(row, &mut self.storage)?;
        }
        for row in plan.to_retire {
            let id = row.id.ok_or(RegistryError::MissingId("assignee"))?;
            self.storage.soft_delete_assignee(id)?;
        }
        Ok(())
    }

    fn update_predecessor_links(
        &mut self,
        record: &CompanyRecord,
        company_id: Uuid,
    ) -> RegistryResult<()> {
        let existing = self.storage.predecessor_links_of(company_id)?;
        let mut incoming = Vec::new();
        for item in &record.predecessors {
            let Some(name) = item.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let predecessor =
                self.refdata
                    .predecessor(&mut self.storage, name, item.edrpou.as_deref())?;
            incoming.push(CompanyToPredecessor::new(predecessor.id));
        }

        let plan = diff_collection(
            incoming,
            existing,
            |link: &CompanyToPredecessor| link.predecessor_id,
            |_, _| Vec::new(),
        );
        for mut row in plan.to_create {
            row.company_id = Some(company_id);
            self.buffer.add_predecessor_link(row, &mut self.storage)?;
        }
        for row in plan.to_retire {
            let id = row.id.ok_or(RegistryError::MissingId("predecessor link"))?;
            self.storage.soft_delete_predecessor_link(id)?;
        }
        Ok(())
    }

    fn update_exchange_data(
        &mut self,
        record: &CompanyRecord,
        company_id: Uuid,
    ) -> RegistryResult<()> {
        let existing = self.storage.exchange_data_of(company_id)?;
        let mut incoming = Vec::new();
        for item in &record.exchange_data {
            let Some(authority_name) = item.authority_name.as_deref().filter(|n| !n.is_empty())
            else {
                continue;
            };
            let authority = self.refdata.authority(&mut self.storage, authority_name)?;
            let mut row = ExchangeDataCompany::new(authority.id);
            if let Some(taxpayer_type) = item.taxpayer_type.as_deref().filter(|t| !t.is_empty()) {
                row.taxpayer_type_id =
                    Some(self.refdata.taxpayer_type(&mut self.storage, taxpayer_type)?.id);
            }
            row.start_date = item.start_date.as_deref().and_then(parse_registry_date);
            row.start_number = item.start_number.clone();
            row.end_date = item.end_date.as_deref().and_then(parse_registry_date);
            row.end_number = item.end_number.clone();
            incoming.push(row);
        }

        let plan = diff_collection(
            incoming,
            existing,
            |row: &ExchangeDataCompany| (row.authority_id, row.start_date),
            |stored, item| stored.merge_from(item),
        );
        for (row, changed) in &plan.to_save {
            self.storage.save_exchange_data(row, changed)?;
        }
        for mut row in plan.to_create {
            row.company_id = Some(company_id);
            self.buffer.add_exchange_data(row, &mut self.storage)?;
        }
        for row in plan.to_retire {
            let id = row.id.ok_or(RegistryError::MissingId("exchange data"))?;
            self.storage.soft_delete_exchange_data(id)?;
        }
        Ok(())
    }

    fn update_termination_started(
        &mut self,
        record: &CompanyRecord,
        company_id: Uuid,
    ) -> RegistryResult<()> {
        let stored = self.storage.termination_started_of(company_id)?;
        match &record.termination_started {
            Some(section) => {
                let incoming = build_termination(section);
                match stored {
                    Some(mut row) => {
                        let changed = row.merge_from(&incoming);
                        if !changed.is_empty() {
                            self.storage.save_termination_started(&row, &changed)?;
                        }
                    }
                    None => {
                        let mut row = incoming;
                        row.company_id = Some(company_id);
                        self.buffer.add_termination(row, &mut self.storage)?;
                    }
                }
            }
            // section retracted upstream: retire the stored event
            None => {
                if let Some(row) = stored {
                    let id = row.id.ok_or(RegistryError::MissingId("termination"))?;
                    self.storage.soft_delete_termination_started(id)?;
                }
            }
        }
        Ok(())
    }

    fn update_bancruptcy_readjustment(
        &mut self,
        record: &CompanyRecord,
        company_id: Uuid,
    ) -> RegistryResult<()> {
        let stored = self.storage.bancruptcy_readjustment_of(company_id)?;
        match &record.bankruptcy_readjustment {
            Some(section) => {
                let incoming = build_bancruptcy(section);
                match stored {
                    Some(mut row) => {
                        let changed = row.merge_from(&incoming);
                        if !changed.is_empty() {
                            self.storage.save_bancruptcy_readjustment(&row, &changed)?;
                        }
                    }
                    None => {
                        let mut row = incoming;
                        row.company_id = Some(company_id);
                        self.buffer
                            .add_bancruptcy_readjustment(row, &mut self.storage)?;
                    }
                }
            }
            None => {
                if let Some(row) = stored {
                    let id = row.id.ok_or(RegistryError::MissingId("bancruptcy"))?;
                    self.storage.soft_delete_bancruptcy_readjustment(id)?;
                }
            }
        }
        Ok(())
    }

    fn build_company_detail(&self, record: &CompanyRecord) -> CompanyDetail {
        CompanyDetail::new(
            record.founding_document_number.clone(),
            record.executive_power.as_deref().map(str::to_lowercase),
            record.superior_management.as_deref().map(str::to_lowercase),
            record.managing_paper.as_deref().map(str::to_lowercase),
            record.terminated_info.as_deref().map(str::to_lowercase),
            record
                .termination_cancel_info
                .as_deref()
                .map(str::to_lowercase),
            record.vp_dates.clone(),
        )
    }

    /// Flush staged companies, back-fill child rows with the assigned
    /// identities, commit every satellite queue and drop per-batch state.
    fn flush(&mut self) -> RegistryResult<()> {
        let new_companies = self.buffer.commit_companies(&mut self.storage)?;
        for company in &new_companies {
            let company_id = company.id.ok_or(RegistryError::MissingId("company"))?;
            let Some(mut pending) = self.pending.remove(&company.code) else {
                continue;
            };
            for mut row in pending.founders.drain(..) {
                row.company_id = Some(company_id);
                self.buffer.add_founder(row, &mut self.storage)?;
            }
            for mut row in pending.signers.drain(..) {
                row.company_id = Some(company_id);
                self.buffer.add_signer(row, &mut self.storage)?;
            }
            for mut row in pending.assignees.drain(..) {
                row.company_id = Some(company_id);
                self.buffer.add_assignee(row, &mut self.storage)?;
            }
            for mut row in pending.predecessor_links.drain(..) {
                row.company_id = Some(company_id);
                self.buffer.add_predecessor_link(row, &mut self.storage)?;
            }
            for mut row in pending.exchange_data.drain(..) {
                row.company_id = Some(company_id);
                self.buffer.add_exchange_data(row, &mut self.storage)?;
            }
            for mut row in pending.kved_links.drain(..) {
                row.company_id = Some(company_id);
                self.buffer.add_kved_link(row, &mut self.storage)?;
            }
            if let Some(mut row) = pending.detail.take() {
                row.company_id = Some(company_id);
                self.buffer.add_company_detail(row, &mut self.storage)?;
            }
            if let Some(mut row) = pending.termination.take() {
                row.company_id = Some(company_id);
                self.buffer.add_termination(row, &mut self.storage)?;
            }
            if let Some(mut row) = pending.bancruptcy.take() {
                row.company_id = Some(company_id);
                self.buffer.add_bancruptcy_readjustment(row, &mut self.storage)?;
            }
        }
        self.buffer.commit_satellites(&mut self.storage)?;
        self.pending.clear();
        Ok(())
    }
}

fn build_termination(section: &TerminationStartedSection) -> TerminationStarted {
    TerminationStarted::new(
        section.op_date.as_deref().and_then(parse_registry_date),
        section.reason.as_deref().map(str::to_lowercase),
        section.sbj_state.as_deref().map(str::to_lowercase),
        section.signer_name.as_deref().map(str::to_lowercase),
        section
            .creditor_req_end_date
            .as_deref()
            .and_then(parse_registry_date)
            .unwrap_or_else(creditor_req_end_date_fallback),
    )
}

fn build_bancruptcy(section: &BankruptcySection) -> BancruptcyReadjustment {
    BancruptcyReadjustment::new(
        section.op_date.as_deref().and_then(parse_registry_date),
        section.reason.as_deref().map(str::to_lowercase),
        section.sbj_state.as_deref().map(str::to_lowercase),
        section.head_name.as_deref().map(str::to_lowercase),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStorage;

    #[test]
    fn test_record_without_edrpou_is_skipped() {
        let mut converter = Converter::new(MemoryStorage::new()).unwrap();
        let record = CompanyRecord {
            name: Some("ТОВ БЕЗ КОДУ".into()),
            ..Default::default()
        };
        converter.process_batch(&[record]).unwrap();
        assert_eq!(converter.storage().stats().total(), 0);
    }

    #[test]
    fn test_new_company_and_children_get_linked_identities() {
        let mut converter = Converter::new(MemoryStorage::new()).unwrap();
        let record = CompanyRecord {
            name: Some("ТОВ РОМАШКА".into()),
            edrpou: Some("12345678".into()),
            signers: vec!["Директор Іванов".into()],
            ..Default::default()
        };
        converter.process_batch(&[record]).unwrap();

        let store = converter.storage();
        let company = store
            .find_company_by_code("тов ромашка12345678")
            .unwrap()
            .expect("company flushed");
        let company_id = company.id.unwrap();

        let signers = store.signers_of(company_id).unwrap();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].name, "директор іванов");
        assert_eq!(signers[0].company_id, Some(company_id));

        // detail row is always staged on the create path
        assert!(store.company_detail_of(company_id).unwrap().is_some());
    }
}
