//! Streaming reader for the full registry XML export
//!
//! The export is a single large document of `<SUBJECT>` elements. Records
//! are pulled one at a time off a `BufRead` so the whole snapshot never has
//! to fit in memory. Element texts are kept raw; the converter owns all
//! normalization.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::record::{
    ActivityKindItem, AssigneeItem, BankruptcySection, CompanyRecord, ExchangeDataItem,
    PredecessorItem, TerminationStartedSection,
};
use crate::types::RegistryResult;

/// Root element of one company record
pub const RECORD_TAG: &[u8] = b"SUBJECT";

/// Iterator of `CompanyRecord`s over a registry export stream.
pub struct XmlRecordReader<B: BufRead> {
    reader: Reader<B>,
    buf: Vec<u8>,
}

impl<B: BufRead> XmlRecordReader<B> {
    pub fn new(source: B) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::with_capacity(4096),
        }
    }

    /// Read up to `size` records; an empty vector means end of document
    pub fn read_chunk(&mut self, size: usize) -> RegistryResult<Vec<CompanyRecord>> {
        let mut chunk = Vec::with_capacity(size);
        while chunk.len() < size {
            match self.next() {
                Some(record) => chunk.push(record?),
                None => break,
            }
        }
        Ok(chunk)
    }

    fn read_subject(&mut self) -> RegistryResult<CompanyRecord> {
        let mut record = CompanyRecord::default();
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let tag = start.name().as_ref().to_vec();
                    self.dispatch_subject_child(&tag, &mut record)?;
                }
                Event::End(end) if end.name().as_ref() == RECORD_TAG => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(record)
    }

    fn dispatch_subject_child(
        &mut self,
        tag: &[u8],
        record: &mut CompanyRecord,
    ) -> RegistryResult<()> {
        match tag {
            b"NAME" => record.name = self.leaf_text(tag)?,
            b"SHORT_NAME" => record.short_name = self.leaf_text(tag)?,
            b"EDRPOU" => record.edrpou = self.leaf_text(tag)?,
            b"ADDRESS" => record.address = self.leaf_text(tag)?,
            b"OPF" => record.company_type = self.leaf_text(tag)?,
            b"STAN" => record.status = self.leaf_text(tag)?,
            b"STATUTE" => record.bylaw = self.leaf_text(tag)?,
            b"FOUNDING_DOCUMENT_NUM" => record.founding_document_number = self.leaf_text(tag)?,
            b"CONTACTS" => record.contact_info = self.leaf_text(tag)?,
            b"VP_DATES" => record.vp_dates = self.leaf_text(tag)?,
            b"EXECUTIVE_POWER" => record.executive_power = self.leaf_text(tag)?,
            b"SUPERIOR_MANAGEMENT" => record.superior_management = self.leaf_text(tag)?,
            b"MANAGING_PAPER" => record.managing_paper = self.leaf_text(tag)?,
            b"TERMINATED_INFO" => record.terminated_info = self.leaf_text(tag)?,
            b"TERMINATION_CANCEL_INFO" => record.termination_cancel_info = self.leaf_text(tag)?,
            b"AUTHORIZED_CAPITAL" => record.authorized_capital = self.leaf_text(tag)?,
            b"REGISTRATION" => record.registration = self.leaf_text(tag)?,
            b"CURRENT_AUTHORITY" => record.current_authority = self.leaf_text(tag)?,
            b"FOUNDERS" => record.founders = self.text_list(tag)?,
            b"BENEFICIARIES" => record.beneficiaries = self.text_list(tag)?,
            b"SIGNERS" => record.signers = self.text_list(tag)?,
            b"ACTIVITY_KINDS" => record.activity_kinds = self.activity_kinds(tag)?,
            b"ASSIGNEES" => record.assignees = self.name_code_items(tag)?,
            b"PREDECESSORS" => {
                record.predecessors = self
                    .name_code_items(tag)?
                    .into_iter()
                    .map(|item| PredecessorItem {
                        name: item.name,
                        edrpou: item.edrpou,
                    })
                    .collect();
            }
            b"EXCHANGE_DATA" => record.exchange_data = self.exchange_data(tag)?,
            b"TERMINATION_STARTED_INFO" => {
                record.termination_started = self.termination_section(tag)?;
            }
            b"BANKRUPTCY_READJUSTMENT_INFO" => {
                record.bankruptcy_readjustment = self.bankruptcy_section(tag)?;
            }
            _ => self.skip_element(tag)?,
        }
        Ok(())
    }

    /// Collect the text content of the element named `tag`, `None` when empty
    fn leaf_text(&mut self, tag: &[u8]) -> RegistryResult<Option<String>> {
        let mut buf = Vec::new();
        let mut text: Option<String> = None;
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Text(bytes) => {
                    let piece = bytes.unescape()?.into_owned();
                    if !piece.is_empty() {
                        text.get_or_insert_with(String::new).push_str(&piece);
                    }
                }
                Event::End(end) if end.name().as_ref() == tag => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(text.filter(|value| !value.trim().is_empty()))
    }

    /// Children of `tag` are plain text items regardless of their own names
    fn text_list(&mut self, tag: &[u8]) -> RegistryResult<Vec<String>> {
        let mut buf = Vec::new();
        let mut items = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let child = start.name().as_ref().to_vec();
                    if let Some(text) = self.leaf_text(&child)? {
                        items.push(text);
                    }
                }
                Event::End(end) if end.name().as_ref() == tag => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(items)
    }

    fn activity_kinds(&mut self, tag: &[u8]) -> RegistryResult<Vec<ActivityKindItem>> {
        let mut buf = Vec::new();
        let mut items = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let child = start.name().as_ref().to_vec();
                    let mut item = ActivityKindItem::default();
                    self.fill_item(&child, |field, text, _present| match field {
                        b"CODE" => item.code = text,
                        b"NAME" => item.name = text,
                        b"PRIMARY" => item.primary = text,
                        _ => {}
                    })?;
                    items.push(item);
                }
                Event::End(end) if end.name().as_ref() == tag => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(items)
    }

    fn name_code_items(&mut self, tag: &[u8]) -> RegistryResult<Vec<AssigneeItem>> {
        let mut buf = Vec::new();
        let mut items = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let child = start.name().as_ref().to_vec();
                    let mut item = AssigneeItem::default();
                    self.fill_item(&child, |field, text, _present| match field {
                        b"NAME" => item.name = text,
                        b"CODE" => item.edrpou = text,
                        _ => {}
                    })?;
                    items.push(item);
                }
                Event::End(end) if end.name().as_ref() == tag => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(items)
    }

    fn exchange_data(&mut self, tag: &[u8]) -> RegistryResult<Vec<ExchangeDataItem>> {
        let mut buf = Vec::new();
        let mut items = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let child = start.name().as_ref().to_vec();
                    let mut item = ExchangeDataItem::default();
                    self.fill_item(&child, |field, text, _present| match field {
                        b"AUTHORITY_NAME" => item.authority_name = text,
                        b"TAX_PAYER_TYPE" => item.taxpayer_type = text,
                        b"START_DATE" => item.start_date = text,
                        b"START_NUM" => item.start_number = text,
                        b"END_DATE" => item.end_date = text,
                        b"END_NUM" => item.end_number = text,
                        _ => {}
                    })?;
                    items.push(item);
                }
                Event::End(end) if end.name().as_ref() == tag => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(items)
    }

    fn termination_section(
        &mut self,
        tag: &[u8],
    ) -> RegistryResult<Option<TerminationStartedSection>> {
        let mut section = TerminationStartedSection::default();
        let mut has_op_date = false;
        self.fill_item(tag, |field, text, present| match field {
            b"OP_DATE" => {
                has_op_date = present;
                section.op_date = text;
            }
            b"REASON" => section.reason = text,
            b"SBJ_STATE" => section.sbj_state = text,
            b"SIGNER_NAME" => section.signer_name = text,
            b"CREDITOR_REQ_END_DATE" => section.creditor_req_end_date = text,
            _ => {}
        })?;
        // the OP_DATE element marks a live event; without it the section
        // is noise and the stored event gets retracted
        Ok(has_op_date.then_some(section))
    }

    fn bankruptcy_section(&mut self, tag: &[u8]) -> RegistryResult<Option<BankruptcySection>> {
        let mut section = BankruptcySection::default();
        let mut has_op_date = false;
        self.fill_item(tag, |field, text, present| match field {
            b"OP_DATE" => {
                has_op_date = present;
                section.op_date = text;
            }
            b"REASON" => section.reason = text,
            b"SBJ_STATE" => section.sbj_state = text,
            b"BANKRUPTCY_READJUSTMENT_HEAD_NAME" => section.head_name = text,
            _ => {}
        })?;
        Ok(has_op_date.then_some(section))
    }

    /// Walk the direct children of `tag`, feeding each leaf to `set` with
    /// its name, text and a presence flag (self-closing leaves are present
    /// with no text)
    fn fill_item(
        &mut self,
        tag: &[u8],
        mut set: impl FnMut(&[u8], Option<String>, bool),
    ) -> RegistryResult<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let child = start.name().as_ref().to_vec();
                    let text = self.leaf_text(&child)?;
                    set(&child, text, true);
                }
                Event::Empty(start) => {
                    let child = start.name().as_ref().to_vec();
                    set(&child, None, true);
                }
                Event::End(end) if end.name().as_ref() == tag => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    fn skip_element(&mut self, tag: &[u8]) -> RegistryResult<()> {
        let start = BytesStart::new(String::from_utf8_lossy(tag).into_owned());
        let mut buf = Vec::new();
        self.reader.read_to_end_into(start.to_end().name(), &mut buf)?;
        Ok(())
    }
}

impl<B: BufRead> Iterator for XmlRecordReader<B> {
    type Item = RegistryResult<CompanyRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            let at_record = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(start)) => start.name().as_ref() == RECORD_TAG,
                Ok(Event::Eof) => return None,
                Ok(_) => false,
                Err(err) => return Some(Err(err.into())),
            };
            if at_record {
                return Some(self.read_subject());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DATA>
  <SUBJECT>
    <NAME>ТОВ РОМАШКА</NAME>
    <SHORT_NAME>РОМАШКА</SHORT_NAME>
    <EDRPOU>12345678</EDRPOU>
    <ADDRESS>м. Київ, вул. Хрещатик, 1</ADDRESS>
    <OPF>товариство з обмеженою відповідальністю</OPF>
    <STAN>зареєстровано</STAN>
    <AUTHORIZED_CAPITAL>10000,50</AUTHORIZED_CAPITAL>
    <REGISTRATION>01.02.2015 відділ реєстрації</REGISTRATION>
    <ACTIVITY_KINDS>
      <ACTIVITY_KIND>
        <CODE>62.01</CODE>
        <NAME>комп'ютерне програмування</NAME>
        <PRIMARY>так</PRIMARY>
      </ACTIVITY_KIND>
      <ACTIVITY_KIND>
        <CODE>62.02</CODE>
        <NAME>консультування</NAME>
      </ACTIVITY_KIND>
    </ACTIVITY_KINDS>
    <FOUNDERS>
      <FOUNDER>ІВАНОВ ІВАН ІВАНОВИЧ, 12345678, розмір внеску до статутного фонду - 100.50 грн.</FOUNDER>
    </FOUNDERS>
    <SIGNERS>
      <SIGNER>ПЕТРЕНКО ПЕТРО</SIGNER>
    </SIGNERS>
    <EXCHANGE_DATA>
      <ANSWER>
        <AUTHORITY_NAME>ДПС у м. Києві</AUTHORITY_NAME>
        <TAX_PAYER_TYPE>юридична особа</TAX_PAYER_TYPE>
        <START_DATE>05.03.2015</START_DATE>
        <START_NUM>7</START_NUM>
        <END_DATE></END_DATE>
        <END_NUM></END_NUM>
      </ANSWER>
    </EXCHANGE_DATA>
    <TERMINATION_STARTED_INFO>
      <OP_DATE>10.10.2020</OP_DATE>
      <REASON>РІШЕННЯ ЗАСНОВНИКІВ</REASON>
      <SBJ_STATE>порушено справу</SBJ_STATE>
    </TERMINATION_STARTED_INFO>
  </SUBJECT>
  <SUBJECT>
    <NAME>ПП БАРВІНОК</NAME>
    <EDRPOU>87654321</EDRPOU>
    <TERMINATION_STARTED_INFO>
      <REASON>без дати</REASON>
    </TERMINATION_STARTED_INFO>
  </SUBJECT>
</DATA>"#;

    #[test]
    fn test_reads_all_subjects() {
        let reader = XmlRecordReader::new(SNAPSHOT.as_bytes());
        let records: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("ТОВ РОМАШКА"));
        assert_eq!(records[1].edrpou.as_deref(), Some("87654321"));
    }

    #[test]
    fn test_flat_fields_and_lists() {
        let mut reader = XmlRecordReader::new(SNAPSHOT.as_bytes());
        let record = reader.next().unwrap().unwrap();

        assert_eq!(record.authorized_capital.as_deref(), Some("10000,50"));
        assert_eq!(
            record.registration.as_deref(),
            Some("01.02.2015 відділ реєстрації")
        );
        assert_eq!(record.founders.len(), 1);
        assert_eq!(record.signers, vec!["ПЕТРЕНКО ПЕТРО".to_string()]);

        assert_eq!(record.activity_kinds.len(), 2);
        assert!(record.activity_kinds[0].is_primary());
        assert!(!record.activity_kinds[1].is_primary());

        let exchange = &record.exchange_data[0];
        assert_eq!(exchange.authority_name.as_deref(), Some("ДПС у м. Києві"));
        assert_eq!(exchange.start_date.as_deref(), Some("05.03.2015"));
        assert_eq!(exchange.end_date, None);
    }

    #[test]
    fn test_termination_section_requires_op_date() {
        let mut reader = XmlRecordReader::new(SNAPSHOT.as_bytes());
        let first = reader.next().unwrap().unwrap();
        let second = reader.next().unwrap().unwrap();

        let termination = first.termination_started.expect("section with OP_DATE");
        assert_eq!(termination.op_date.as_deref(), Some("10.10.2020"));
        assert_eq!(termination.reason.as_deref(), Some("РІШЕННЯ ЗАСНОВНИКІВ"));

        assert!(second.termination_started.is_none());
    }

    #[test]
    fn test_read_chunk_stops_at_eof() {
        let mut reader = XmlRecordReader::new(SNAPSHOT.as_bytes());
        let chunk = reader.read_chunk(10).unwrap();
        assert_eq!(chunk.len(), 2);
        assert!(reader.read_chunk(10).unwrap().is_empty());
    }
}
