//! In-memory storage implementation for testing and development

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::models::*;
use crate::traits::RegistryStorage;
use crate::types::{RegistryError, RegistryResult, WriteStats};

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// In-memory `RegistryStorage` backend.
///
/// Rows live in plain vectors; soft-deleted rows stay in place with
/// `deleted_at` set and are excluded from reads, exactly as a relational
/// backend would filter them. Write counters expose how quiet a
/// reconciliation pass was.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    companies: Vec<Company>,
    founders: Vec<Founder>,
    signers: Vec<Signer>,
    assignees: Vec<Assignee>,
    kved_links: Vec<CompanyToKved>,
    predecessor_links: Vec<CompanyToPredecessor>,
    exchange_data: Vec<ExchangeDataCompany>,
    company_details: Vec<CompanyDetail>,
    terminations: Vec<TerminationStarted>,
    bancruptcy_readjustments: Vec<BancruptcyReadjustment>,
    bylaws: Vec<Bylaw>,
    predecessors: Vec<Predecessor>,
    authorities: Vec<Authority>,
    taxpayer_types: Vec<TaxpayerType>,
    kveds: Vec<KvedCode>,
    stats: WriteStats,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write-volume counters accumulated since construction or the last
    /// `reset_stats`
    pub fn stats(&self) -> &WriteStats {
        &self.stats
    }

    /// Zero the counters, keeping the data (useful between import runs)
    pub fn reset_stats(&mut self) {
        self.stats = WriteStats::default();
    }

    /// Drop all data and counters
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// All founder rows of a company including soft-deleted ones
    pub fn founders_including_deleted(&self, company_id: Uuid) -> Vec<&Founder> {
        self.founders
            .iter()
            .filter(|row| row.company_id == Some(company_id))
            .collect()
    }

    fn assign_id<T>(rows: &mut [T], set: impl Fn(&mut T)) {
        rows.iter_mut().for_each(set);
    }
}

macro_rules! save_by_id {
    ($self:ident, $field:ident, $row:expr, $kind:literal) => {{
        let id = $row.id.ok_or(RegistryError::MissingId($kind))?;
        match $self.$field.iter_mut().find(|stored| stored.id == Some(id)) {
            Some(stored) => {
                *stored = $row.clone();
                $self.stats.saves += 1;
                Ok(())
            }
            None => Err(RegistryError::Storage(format!(
                "{} {id} does not exist",
                $kind
            ))),
        }
    }};
}

macro_rules! soft_delete_by_id {
    ($self:ident, $field:ident, $id:expr, $kind:literal) => {{
        match $self
            .$field
            .iter_mut()
            .find(|stored| stored.id == Some($id) && stored.deleted_at.is_none())
        {
            Some(stored) => {
                stored.deleted_at = Some(now());
                $self.stats.soft_deletes += 1;
                Ok(())
            }
            None => Err(RegistryError::Storage(format!(
                "{} {} does not exist",
                $kind, $id
            ))),
        }
    }};
}

impl RegistryStorage for MemoryStorage {
    fn find_company_by_code(&self, code: &str) -> RegistryResult<Option<Company>> {
        Ok(self
            .companies
            .iter()
            .find(|row| row.code == code && row.deleted_at.is_none())
            .cloned())
    }

    fn bulk_create_companies(&mut self, mut rows: Vec<Company>) -> RegistryResult<Vec<Company>> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.companies.extend(rows.iter().cloned());
        Ok(rows)
    }

    fn save_company(&mut self, row: &Company, _changed: &[&str]) -> RegistryResult<()> {
        save_by_id!(self, companies, row, "company")
    }

    fn founders_of(&self, company_id: Uuid) -> RegistryResult<Vec<Founder>> {
        Ok(self
            .founders
            .iter()
            .filter(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn bulk_create_founders(&mut self, mut rows: Vec<Founder>) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.founders.extend(rows);
        Ok(())
    }

    fn save_founder(&mut self, row: &Founder, _changed: &[&str]) -> RegistryResult<()> {
        save_by_id!(self, founders, row, "founder")
    }

    fn soft_delete_founder(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, founders, id, "founder")
    }

    fn signers_of(&self, company_id: Uuid) -> RegistryResult<Vec<Signer>> {
        Ok(self
            .signers
            .iter()
            .filter(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn bulk_create_signers(&mut self, mut rows: Vec<Signer>) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.signers.extend(rows);
        Ok(())
    }

    fn soft_delete_signer(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, signers, id, "signer")
    }

    fn assignees_of(&self, company_id: Uuid) -> RegistryResult<Vec<Assignee>> {
        Ok(self
            .assignees
            .iter()
            .filter(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn bulk_create_assignees(&mut self, mut rows: Vec<Assignee>) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.assignees.extend(rows);
        Ok(())
    }

    fn soft_delete_assignee(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, assignees, id, "assignee")
    }

    fn kved_links_of(&self, company_id: Uuid) -> RegistryResult<Vec<CompanyToKved>> {
        Ok(self
            .kved_links
            .iter()
            .filter(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn bulk_create_kved_links(&mut self, mut rows: Vec<CompanyToKved>) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.kved_links.extend(rows);
        Ok(())
    }

    fn save_kved_link(&mut self, row: &CompanyToKved, _changed: &[&str]) -> RegistryResult<()> {
        save_by_id!(self, kved_links, row, "kved link")
    }

    fn soft_delete_kved_link(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, kved_links, id, "kved link")
    }

    fn predecessor_links_of(&self, company_id: Uuid) -> RegistryResult<Vec<CompanyToPredecessor>> {
        Ok(self
            .predecessor_links
            .iter()
            .filter(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn bulk_create_predecessor_links(
        &mut self,
        mut rows: Vec<CompanyToPredecessor>,
    ) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.predecessor_links.extend(rows);
        Ok(())
    }

    fn soft_delete_predecessor_link(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, predecessor_links, id, "predecessor link")
    }

    fn exchange_data_of(&self, company_id: Uuid) -> RegistryResult<Vec<ExchangeDataCompany>> {
        Ok(self
            .exchange_data
            .iter()
            .filter(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn bulk_create_exchange_data(
        &mut self,
        mut rows: Vec<ExchangeDataCompany>,
    ) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.exchange_data.extend(rows);
        Ok(())
    }

    fn save_exchange_data(
        &mut self,
        row: &ExchangeDataCompany,
        _changed: &[&str],
    ) -> RegistryResult<()> {
        save_by_id!(self, exchange_data, row, "exchange data")
    }

    fn soft_delete_exchange_data(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, exchange_data, id, "exchange data")
    }

    fn company_detail_of(&self, company_id: Uuid) -> RegistryResult<Option<CompanyDetail>> {
        Ok(self
            .company_details
            .iter()
            .find(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned())
    }

    fn bulk_create_company_details(&mut self, mut rows: Vec<CompanyDetail>) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.company_details.extend(rows);
        Ok(())
    }

    fn save_company_detail(
        &mut self,
        row: &CompanyDetail,
        _changed: &[&str],
    ) -> RegistryResult<()> {
        save_by_id!(self, company_details, row, "company detail")
    }

    fn termination_started_of(
        &self,
        company_id: Uuid,
    ) -> RegistryResult<Option<TerminationStarted>> {
        Ok(self
            .terminations
            .iter()
            .find(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned())
    }

    fn bulk_create_terminations(
        &mut self,
        mut rows: Vec<TerminationStarted>,
    ) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.terminations.extend(rows);
        Ok(())
    }

    fn save_termination_started(
        &mut self,
        row: &TerminationStarted,
        _changed: &[&str],
    ) -> RegistryResult<()> {
        save_by_id!(self, terminations, row, "termination")
    }

    fn soft_delete_termination_started(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, terminations, id, "termination")
    }

    fn bancruptcy_readjustment_of(
        &self,
        company_id: Uuid,
    ) -> RegistryResult<Option<BancruptcyReadjustment>> {
        Ok(self
            .bancruptcy_readjustments
            .iter()
            .find(|row| row.company_id == Some(company_id) && row.deleted_at.is_none())
            .cloned())
    }

    fn bulk_create_bancruptcy_readjustments(
        &mut self,
        mut rows: Vec<BancruptcyReadjustment>,
    ) -> RegistryResult<()> {
        Self::assign_id(&mut rows, |row| {
            row.id.get_or_insert_with(Uuid::new_v4);
        });
        self.stats.inserts += rows.len();
        self.bancruptcy_readjustments.extend(rows);
        Ok(())
    }

    fn save_bancruptcy_readjustment(
        &mut self,
        row: &BancruptcyReadjustment,
        _changed: &[&str],
    ) -> RegistryResult<()> {
        save_by_id!(self, bancruptcy_readjustments, row, "bancruptcy")
    }

    fn soft_delete_bancruptcy_readjustment(&mut self, id: Uuid) -> RegistryResult<()> {
        soft_delete_by_id!(self, bancruptcy_readjustments, id, "bancruptcy")
    }

    fn load_bylaws(&self) -> RegistryResult<Vec<Bylaw>> {
        Ok(self.bylaws.clone())
    }

    fn create_bylaw(&mut self, name: &str) -> RegistryResult<Bylaw> {
        let row = Bylaw {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.stats.inserts += 1;
        self.bylaws.push(row.clone());
        Ok(row)
    }

    fn load_predecessors(&self) -> RegistryResult<Vec<Predecessor>> {
        Ok(self.predecessors.clone())
    }

    fn create_predecessor(
        &mut self,
        name: &str,
        edrpou: Option<&str>,
    ) -> RegistryResult<Predecessor> {
        let row = Predecessor {
            id: Uuid::new_v4(),
            name: name.to_string(),
            edrpou: edrpou.map(str::to_string),
        };
        self.stats.inserts += 1;
        self.predecessors.push(row.clone());
        Ok(row)
    }

    fn load_authorities(&self) -> RegistryResult<Vec<Authority>> {
        Ok(self.authorities.clone())
    }

    fn create_authority(&mut self, name: &str) -> RegistryResult<Authority> {
        let row = Authority {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.stats.inserts += 1;
        self.authorities.push(row.clone());
        Ok(row)
    }

    fn load_taxpayer_types(&self) -> RegistryResult<Vec<TaxpayerType>> {
        Ok(self.taxpayer_types.clone())
    }

    fn create_taxpayer_type(&mut self, name: &str) -> RegistryResult<TaxpayerType> {
        let row = TaxpayerType {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.stats.inserts += 1;
        self.taxpayer_types.push(row.clone());
        Ok(row)
    }

    fn load_kveds(&self) -> RegistryResult<Vec<KvedCode>> {
        Ok(self.kveds.clone())
    }

    fn create_kved(&mut self, code: &str, name: &str) -> RegistryResult<KvedCode> {
        let row = KvedCode {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
        };
        self.stats.inserts += 1;
        self.kveds.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_create_assigns_identities() {
        let mut store = MemoryStorage::new();
        let created = store
            .bulk_create_companies(vec![Company::new("тест00000001".into(), "00000001".into())])
            .unwrap();
        assert!(created[0].id.is_some());
        assert_eq!(store.stats().inserts, 1);

        let found = store.find_company_by_code("тест00000001").unwrap();
        assert_eq!(found.unwrap().id, created[0].id);
    }

    #[test]
    fn test_soft_deleted_rows_are_hidden_not_removed() {
        let mut store = MemoryStorage::new();
        let company = store
            .bulk_create_companies(vec![Company::new("тест00000001".into(), "00000001".into())])
            .unwrap()
            .remove(0);
        let company_id = company.id.unwrap();

        let mut founder = Founder::founder("запис".into(), Some("назва".into()), None, None, None, false);
        founder.company_id = Some(company_id);
        store.bulk_create_founders(vec![founder]).unwrap();

        let stored = store.founders_of(company_id).unwrap();
        store.soft_delete_founder(stored[0].id.unwrap()).unwrap();

        assert!(store.founders_of(company_id).unwrap().is_empty());
        assert_eq!(store.founders_including_deleted(company_id).len(), 1);
        assert_eq!(store.stats().soft_deletes, 1);
    }

    #[test]
    fn test_save_of_unknown_row_is_an_error() {
        let mut store = MemoryStorage::new();
        let mut company = Company::new("тест00000001".into(), "00000001".into());
        company.id = Some(Uuid::new_v4());
        assert!(store.save_company(&company, &["name"]).is_err());
    }
}
