//! Batched write buffer
//!
//! Staged rows accumulate here across many records, grouped by entity
//! type, and each group is flushed as one bulk call to keep round-trips
//! down. A queue that reaches the chunk size flushes itself; `commit_*`
//! forces a flush regardless of size. Companies are special: every
//! company flushed during a batch is retained (with its storage-assigned
//! identity) so that deferred child rows can be back-filled at the end of
//! the batch, whether or not the company queue auto-flushed mid-batch.

use crate::models::*;
use crate::traits::RegistryStorage;
use crate::types::RegistryResult;

/// Default number of staged rows per entity type before an auto-flush
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Type-keyed staged-insert queues
#[derive(Debug)]
pub struct WriteBuffer {
    chunk_size: usize,
    companies: Vec<Company>,
    /// Companies already flushed this batch, ids assigned
    flushed_companies: Vec<Company>,
    founders: Vec<Founder>,
    signers: Vec<Signer>,
    assignees: Vec<Assignee>,
    kved_links: Vec<CompanyToKved>,
    predecessor_links: Vec<CompanyToPredecessor>,
    exchange_data: Vec<ExchangeDataCompany>,
    company_details: Vec<CompanyDetail>,
    terminations: Vec<TerminationStarted>,
    bancruptcy_readjustments: Vec<BancruptcyReadjustment>,
}

impl WriteBuffer {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            companies: Vec::new(),
            flushed_companies: Vec::new(),
            founders: Vec::new(),
            signers: Vec::new(),
            assignees: Vec::new(),
            kved_links: Vec::new(),
            predecessor_links: Vec::new(),
            exchange_data: Vec::new(),
            company_details: Vec::new(),
            terminations: Vec::new(),
            bancruptcy_readjustments: Vec::new(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn add_company<S: RegistryStorage>(
        &mut self,
        row: Company,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.companies.push(row);
        if self.companies.len() >= self.chunk_size {
            self.flush_companies(store)?;
        }
        Ok(())
    }

    fn flush_companies<S: RegistryStorage>(&mut self, store: &mut S) -> RegistryResult<()> {
        if !self.companies.is_empty() {
            let created = store.bulk_create_companies(std::mem::take(&mut self.companies))?;
            self.flushed_companies.extend(created);
        }
        Ok(())
    }

    /// Flush any queued companies and hand back every company created
    /// during this batch, identities assigned.
    pub fn commit_companies<S: RegistryStorage>(
        &mut self,
        store: &mut S,
    ) -> RegistryResult<Vec<Company>> {
        self.flush_companies(store)?;
        Ok(std::mem::take(&mut self.flushed_companies))
    }

    pub fn add_founder<S: RegistryStorage>(
        &mut self,
        row: Founder,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.founders.push(row);
        if self.founders.len() >= self.chunk_size {
            store.bulk_create_founders(std::mem::take(&mut self.founders))?;
        }
        Ok(())
    }

    pub fn commit_founders<S: RegistryStorage>(&mut self, store: &mut S) -> RegistryResult<()> {
        if !self.founders.is_empty() {
            store.bulk_create_founders(std::mem::take(&mut self.founders))?;
        }
        Ok(())
    }

    pub fn add_signer<S: RegistryStorage>(
        &mut self,
        row: Signer,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.signers.push(row);
        if self.signers.len() >= self.chunk_size {
            store.bulk_create_signers(std::mem::take(&mut self.signers))?;
        }
        Ok(())
    }

    pub fn commit_signers<S: RegistryStorage>(&mut self, store: &mut S) -> RegistryResult<()> {
        if !self.signers.is_empty() {
            store.bulk_create_signers(std::mem::take(&mut self.signers))?;
        }
        Ok(())
    }

    pub fn add_assignee<S: RegistryStorage>(
        &mut self,
        row: Assignee,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.assignees.push(row);
        if self.assignees.len() >= self.chunk_size {
            store.bulk_create_assignees(std::mem::take(&mut self.assignees))?;
        }
        Ok(())
    }

    pub fn commit_assignees<S: RegistryStorage>(&mut self, store: &mut S) -> RegistryResult<()> {
        if !self.assignees.is_empty() {
            store.bulk_create_assignees(std::mem::take(&mut self.assignees))?;
        }
        Ok(())
    }

    pub fn add_kved_link<S: RegistryStorage>(
        &mut self,
        row: CompanyToKved,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.kved_links.push(row);
        if self.kved_links.len() >= self.chunk_size {
            store.bulk_create_kved_links(std::mem::take(&mut self.kved_links))?;
        }
        Ok(())
    }

    pub fn commit_kved_links<S: RegistryStorage>(&mut self, store: &mut S) -> RegistryResult<()> {
        if !self.kved_links.is_empty() {
            store.bulk_create_kved_links(std::mem::take(&mut self.kved_links))?;
        }
        Ok(())
    }

    pub fn add_predecessor_link<S: RegistryStorage>(
        &mut self,
        row: CompanyToPredecessor,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.predecessor_links.push(row);
        if self.predecessor_links.len() >= self.chunk_size {
            store.bulk_create_predecessor_links(std::mem::take(&mut self.predecessor_links))?;
        }
        Ok(())
    }

    pub fn commit_predecessor_links<S: RegistryStorage>(
        &mut self,
        store: &mut S,
    ) -> RegistryResult<()> {
        if !self.predecessor_links.is_empty() {
            store.bulk_create_predecessor_links(std::mem::take(&mut self.predecessor_links))?;
        }
        Ok(())
    }

    pub fn add_exchange_data<S: RegistryStorage>(
        &mut self,
        row: ExchangeDataCompany,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.exchange_data.push(row);
        if self.exchange_data.len() >= self.chunk_size {
            store.bulk_create_exchange_data(std::mem::take(&mut self.exchange_data))?;
        }
        Ok(())
    }

    pub fn commit_exchange_data<S: RegistryStorage>(
        &mut self,
        store: &mut S,
    ) -> RegistryResult<()> {
        if !self.exchange_data.is_empty() {
            store.bulk_create_exchange_data(std::mem::take(&mut self.exchange_data))?;
        }
        Ok(())
    }

    pub fn add_company_detail<S: RegistryStorage>(
        &mut self,
        row: CompanyDetail,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.company_details.push(row);
        if self.company_details.len() >= self.chunk_size {
            store.bulk_create_company_details(std::mem::take(&mut self.company_details))?;
        }
        Ok(())
    }

    pub fn commit_company_details<S: RegistryStorage>(
        &mut self,
        store: &mut S,
    ) -> RegistryResult<()> {
        if !self.company_details.is_empty() {
            store.bulk_create_company_details(std::mem::take(&mut self.company_details))?;
        }
        Ok(())
    }

    pub fn add_termination<S: RegistryStorage>(
        &mut self,
        row: TerminationStarted,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.terminations.push(row);
        if self.terminations.len() >= self.chunk_size {
            store.bulk_create_terminations(std::mem::take(&mut self.terminations))?;
        }
        Ok(())
    }

    pub fn commit_terminations<S: RegistryStorage>(&mut self, store: &mut S) -> RegistryResult<()> {
        if !self.terminations.is_empty() {
            store.bulk_create_terminations(std::mem::take(&mut self.terminations))?;
        }
        Ok(())
    }

    pub fn add_bancruptcy_readjustment<S: RegistryStorage>(
        &mut self,
        row: BancruptcyReadjustment,
        store: &mut S,
    ) -> RegistryResult<()> {
        self.bancruptcy_readjustments.push(row);
        if self.bancruptcy_readjustments.len() >= self.chunk_size {
            store.bulk_create_bancruptcy_readjustments(std::mem::take(
                &mut self.bancruptcy_readjustments,
            ))?;
        }
        Ok(())
    }

    pub fn commit_bancruptcy_readjustments<S: RegistryStorage>(
        &mut self,
        store: &mut S,
    ) -> RegistryResult<()> {
        if !self.bancruptcy_readjustments.is_empty() {
            store.bulk_create_bancruptcy_readjustments(std::mem::take(
                &mut self.bancruptcy_readjustments,
            ))?;
        }
        Ok(())
    }

    /// Commit every satellite queue in dependency order
    pub fn commit_satellites<S: RegistryStorage>(&mut self, store: &mut S) -> RegistryResult<()> {
        self.commit_founders(store)?;
        self.commit_signers(store)?;
        self.commit_assignees(store)?;
        self.commit_predecessor_links(store)?;
        self.commit_exchange_data(store)?;
        self.commit_kved_links(store)?;
        self.commit_company_details(store)?;
        self.commit_terminations(store)?;
        self.commit_bancruptcy_readjustments(store)?;
        Ok(())
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStorage;

    #[test]
    fn test_auto_flush_at_chunk_size() {
        let mut store = MemoryStorage::new();
        let mut buffer = WriteBuffer::new(2);

        buffer
            .add_signer(Signer::new("перший підписант".into()), &mut store)
            .unwrap();
        assert_eq!(store.stats().inserts, 0);

        buffer
            .add_signer(Signer::new("другий підписант".into()), &mut store)
            .unwrap();
        assert_eq!(store.stats().inserts, 2);
    }

    #[test]
    fn test_commit_flushes_partial_queue() {
        let mut store = MemoryStorage::new();
        let mut buffer = WriteBuffer::new(100);

        buffer
            .add_signer(Signer::new("підписант".into()), &mut store)
            .unwrap();
        assert_eq!(store.stats().inserts, 0);

        buffer.commit_signers(&mut store).unwrap();
        assert_eq!(store.stats().inserts, 1);

        // nothing queued, nothing written
        buffer.commit_signers(&mut store).unwrap();
        assert_eq!(store.stats().inserts, 1);
    }

    #[test]
    fn test_companies_flushed_mid_batch_are_retained_for_backfill() {
        let mut store = MemoryStorage::new();
        let mut buffer = WriteBuffer::new(1);

        buffer
            .add_company(
                Company::new("перша00000001".into(), "00000001".into()),
                &mut store,
            )
            .unwrap();
        buffer
            .add_company(
                Company::new("друга00000002".into(), "00000002".into()),
                &mut store,
            )
            .unwrap();

        let flushed = buffer.commit_companies(&mut store).unwrap();
        assert_eq!(flushed.len(), 2);
        assert!(flushed.iter().all(|c| c.id.is_some()));

        // a second commit hands back nothing
        assert!(buffer.commit_companies(&mut store).unwrap().is_empty());
    }
}
