//! Storage abstraction for the registry synchronizer
//!
//! The converter never talks to a database directly; it works through this
//! trait, so any relational backend (PostgreSQL, SQLite, in-memory, ...)
//! can sit behind it. The surface is exactly what the reconciler needs:
//! filter-by-owning-company, bulk create, save-with-changed-field-list and
//! soft-delete per satellite type, plus lookup/create for the shared
//! reference entities.
//!
//! All calls are blocking: records are processed strictly in document
//! order by a single converter, so there is nothing to overlap.

use uuid::Uuid;

use crate::models::*;
use crate::types::RegistryResult;

/// Storage backend for the registry synchronizer.
///
/// Bulk-create calls are the unit of atomicity; `bulk_create_companies`
/// must assign and return durable identities so that deferred child rows
/// can be back-filled. Read methods must exclude soft-deleted rows.
pub trait RegistryStorage {
    // Companies

    /// Look up a company by its composite natural key
    fn find_company_by_code(&self, code: &str) -> RegistryResult<Option<Company>>;

    /// Insert companies in one round-trip, returning them with `id` set
    fn bulk_create_companies(&mut self, rows: Vec<Company>) -> RegistryResult<Vec<Company>>;

    /// Persist the listed changed fields of an existing company
    fn save_company(&mut self, row: &Company, changed: &[&str]) -> RegistryResult<()>;

    // Founders (founder and beneficiary records share this table)

    fn founders_of(&self, company_id: Uuid) -> RegistryResult<Vec<Founder>>;
    fn bulk_create_founders(&mut self, rows: Vec<Founder>) -> RegistryResult<()>;
    fn save_founder(&mut self, row: &Founder, changed: &[&str]) -> RegistryResult<()>;
    fn soft_delete_founder(&mut self, id: Uuid) -> RegistryResult<()>;

    // Signers

    fn signers_of(&self, company_id: Uuid) -> RegistryResult<Vec<Signer>>;
    fn bulk_create_signers(&mut self, rows: Vec<Signer>) -> RegistryResult<()>;
    fn soft_delete_signer(&mut self, id: Uuid) -> RegistryResult<()>;

    // Assignees

    fn assignees_of(&self, company_id: Uuid) -> RegistryResult<Vec<Assignee>>;
    fn bulk_create_assignees(&mut self, rows: Vec<Assignee>) -> RegistryResult<()>;
    fn soft_delete_assignee(&mut self, id: Uuid) -> RegistryResult<()>;

    // KVED links

    fn kved_links_of(&self, company_id: Uuid) -> RegistryResult<Vec<CompanyToKved>>;
    fn bulk_create_kved_links(&mut self, rows: Vec<CompanyToKved>) -> RegistryResult<()>;
    fn save_kved_link(&mut self, row: &CompanyToKved, changed: &[&str]) -> RegistryResult<()>;
    fn soft_delete_kved_link(&mut self, id: Uuid) -> RegistryResult<()>;

    // Predecessor links

    fn predecessor_links_of(&self, company_id: Uuid) -> RegistryResult<Vec<CompanyToPredecessor>>;
    fn bulk_create_predecessor_links(
        &mut self,
        rows: Vec<CompanyToPredecessor>,
    ) -> RegistryResult<()>;
    fn soft_delete_predecessor_link(&mut self, id: Uuid) -> RegistryResult<()>;

    // Exchange data

    fn exchange_data_of(&self, company_id: Uuid) -> RegistryResult<Vec<ExchangeDataCompany>>;
    fn bulk_create_exchange_data(&mut self, rows: Vec<ExchangeDataCompany>) -> RegistryResult<()>;
    fn save_exchange_data(
        &mut self,
        row: &ExchangeDataCompany,
        changed: &[&str],
    ) -> RegistryResult<()>;
    fn soft_delete_exchange_data(&mut self, id: Uuid) -> RegistryResult<()>;

    // Company detail (at most one per company)

    fn company_detail_of(&self, company_id: Uuid) -> RegistryResult<Option<CompanyDetail>>;
    fn bulk_create_company_details(&mut self, rows: Vec<CompanyDetail>) -> RegistryResult<()>;
    fn save_company_detail(&mut self, row: &CompanyDetail, changed: &[&str])
        -> RegistryResult<()>;

    // Termination-started events (at most one per company)

    fn termination_started_of(&self, company_id: Uuid)
        -> RegistryResult<Option<TerminationStarted>>;
    fn bulk_create_terminations(&mut self, rows: Vec<TerminationStarted>) -> RegistryResult<()>;
    fn save_termination_started(
        &mut self,
        row: &TerminationStarted,
        changed: &[&str],
    ) -> RegistryResult<()>;
    fn soft_delete_termination_started(&mut self, id: Uuid) -> RegistryResult<()>;

    // Bankruptcy-readjustment events (at most one per company)

    fn bancruptcy_readjustment_of(
        &self,
        company_id: Uuid,
    ) -> RegistryResult<Option<BancruptcyReadjustment>>;
    fn bulk_create_bancruptcy_readjustments(
        &mut self,
        rows: Vec<BancruptcyReadjustment>,
    ) -> RegistryResult<()>;
    fn save_bancruptcy_readjustment(
        &mut self,
        row: &BancruptcyReadjustment,
        changed: &[&str],
    ) -> RegistryResult<()>;
    fn soft_delete_bancruptcy_readjustment(&mut self, id: Uuid) -> RegistryResult<()>;

    // Shared reference entities, deduplicated by natural key

    fn load_bylaws(&self) -> RegistryResult<Vec<Bylaw>>;
    fn create_bylaw(&mut self, name: &str) -> RegistryResult<Bylaw>;

    fn load_predecessors(&self) -> RegistryResult<Vec<Predecessor>>;
    fn create_predecessor(&mut self, name: &str, edrpou: Option<&str>)
        -> RegistryResult<Predecessor>;

    fn load_authorities(&self) -> RegistryResult<Vec<Authority>>;
    fn create_authority(&mut self, name: &str) -> RegistryResult<Authority>;

    fn load_taxpayer_types(&self) -> RegistryResult<Vec<TaxpayerType>>;
    fn create_taxpayer_type(&mut self, name: &str) -> RegistryResult<TaxpayerType>;

    fn load_kveds(&self) -> RegistryResult<Vec<KvedCode>>;
    fn create_kved(&mut self, code: &str, name: &str) -> RegistryResult<KvedCode>;
}
