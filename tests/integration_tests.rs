//! Integration tests for register-core

use bigdecimal::BigDecimal;
use std::str::FromStr;

use register_core::{utils::MemoryStorage, Converter, RegistryStorage, XmlRecordReader};

const ROMASHKA_CODE: &str = "тов ромашка12345678";

fn snapshot(extra: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<DATA>
  <SUBJECT>
    <NAME>ТОВ РОМАШКА</NAME>
    <SHORT_NAME>РОМАШКА</SHORT_NAME>
    <EDRPOU>12345678</EDRPOU>
    <ADDRESS>м. Київ, вул. Хрещатик, 1</ADDRESS>
    <OPF>товариство з обмеженою відповідальністю</OPF>
    <STAN>зареєстровано</STAN>
    <AUTHORIZED_CAPITAL>10000,00</AUTHORIZED_CAPITAL>
    <REGISTRATION>01.02.2015 відділ реєстрації</REGISTRATION>
    <CURRENT_AUTHORITY>Голосіївська районна адміністрація</CURRENT_AUTHORITY>
    <ACTIVITY_KINDS>
      <ACTIVITY_KIND>
        <CODE>62.01</CODE>
        <NAME>комп'ютерне програмування</NAME>
        <PRIMARY>так</PRIMARY>
      </ACTIVITY_KIND>
    </ACTIVITY_KINDS>
    <FOUNDERS>
      <FOUNDER>ІВАНОВ ІВАН ІВАНОВИЧ, 12345678, розмір внеску до статутного фонду 100.50 грн.</FOUNDER>
    </FOUNDERS>
    <SIGNERS>
      <SIGNER>ПЕТРЕНКО ПЕТРО ПЕТРОВИЧ</SIGNER>
    </SIGNERS>
    <EXCHANGE_DATA>
      <ANSWER>
        <AUTHORITY_NAME>ДПС у м. Києві</AUTHORITY_NAME>
        <TAX_PAYER_TYPE>юридична особа</TAX_PAYER_TYPE>
        <START_DATE>05.03.2015</START_DATE>
        <START_NUM>7</START_NUM>
      </ANSWER>
    </EXCHANGE_DATA>
    {extra}
  </SUBJECT>
</DATA>"#
    )
}

fn import(xml: &str, storage: MemoryStorage) -> MemoryStorage {
    let records: Vec<_> = XmlRecordReader::new(xml.as_bytes())
        .collect::<Result<_, _>>()
        .expect("snapshot parses");
    let mut converter = Converter::new(storage).expect("cache warms");
    converter.process_batch(&records).expect("batch converts");
    converter.into_storage()
}

#[test]
fn test_complete_import_workflow() {
    let store = import(&snapshot(""), MemoryStorage::new());

    let company = store
        .find_company_by_code(ROMASHKA_CODE)
        .unwrap()
        .expect("company created");
    assert_eq!(company.name.as_deref(), Some("тов ромашка"));
    assert_eq!(company.edrpou, "12345678");
    assert_eq!(company.status.as_deref(), Some("зареєстровано"));
    assert_eq!(
        company.authorized_capital,
        BigDecimal::from_str("10000.00").ok()
    );
    assert_eq!(
        company.registration_date,
        chrono::NaiveDate::from_ymd_opt(2015, 2, 1)
    );
    assert_eq!(
        company.registration_info.as_deref(),
        Some("відділ реєстрації")
    );
    assert!(company.authority_id.is_some());

    let company_id = company.id.unwrap();

    // founder line decomposed into name, registry number and equity
    let founders = store.founders_of(company_id).unwrap();
    assert_eq!(founders.len(), 1);
    let founder = &founders[0];
    assert_eq!(founder.name.as_deref(), Some("іванов іван іванович"));
    assert_eq!(founder.edrpou.as_deref(), Some("12345678"));
    assert_eq!(founder.equity, BigDecimal::from_str("100.50").ok());
    assert_eq!(founder.address, None);
    assert!(founder.is_founder);
    assert!(!founder.is_beneficiary);

    let signers = store.signers_of(company_id).unwrap();
    assert_eq!(signers.len(), 1);
    assert_eq!(signers[0].name, "петренко петро петрович");

    let kved_links = store.kved_links_of(company_id).unwrap();
    assert_eq!(kved_links.len(), 1);
    assert!(kved_links[0].primary_kved);

    let exchange = store.exchange_data_of(company_id).unwrap();
    assert_eq!(exchange.len(), 1);
    assert_eq!(
        exchange[0].start_date,
        chrono::NaiveDate::from_ymd_opt(2015, 3, 5)
    );
    assert_eq!(exchange[0].start_number.as_deref(), Some("7"));
    assert!(exchange[0].taxpayer_type_id.is_some());

    assert!(store.company_detail_of(company_id).unwrap().is_some());
}

#[test]
fn test_second_identical_run_writes_nothing() {
    let xml = snapshot("");
    let mut store = import(&xml, MemoryStorage::new());
    store.reset_stats();

    let store = import(&xml, store);
    let stats = store.stats();
    assert_eq!(stats.inserts, 0, "no new rows on an identical run");
    assert_eq!(stats.saves, 0, "no saves on an identical run");
    assert_eq!(stats.soft_deletes, 0, "no retirements on an identical run");
}

#[test]
fn test_changed_fields_are_saved_in_place() {
    let mut store = import(&snapshot(""), MemoryStorage::new());
    store.reset_stats();

    let updated = snapshot("").replace("зареєстровано", "в стані припинення");
    let store = import(&updated, store);

    let company = store
        .find_company_by_code(ROMASHKA_CODE)
        .unwrap()
        .expect("company kept");
    assert_eq!(company.status.as_deref(), Some("в стані припинення"));
    assert_eq!(store.stats().saves, 1);
    assert_eq!(store.stats().inserts, 0);
    assert_eq!(store.stats().soft_deletes, 0);
}

#[test]
fn test_termination_is_retracted_when_section_disappears() {
    let with_termination = snapshot(
        "<TERMINATION_STARTED_INFO>\
           <OP_DATE>10.10.2020</OP_DATE>\
           <REASON>РІШЕННЯ ЗАСНОВНИКІВ</REASON>\
           <SBJ_STATE>порушено справу</SBJ_STATE>\
         </TERMINATION_STARTED_INFO>",
    );
    let mut store = import(&with_termination, MemoryStorage::new());

    let company_id = store
        .find_company_by_code(ROMASHKA_CODE)
        .unwrap()
        .unwrap()
        .id
        .unwrap();
    let termination = store
        .termination_started_of(company_id)
        .unwrap()
        .expect("termination recorded");
    assert_eq!(
        termination.op_date,
        chrono::NaiveDate::from_ymd_opt(2020, 10, 10)
    );
    assert_eq!(termination.reason.as_deref(), Some("рішення засновників"));
    // no creditor date in the section, the placeholder fills in
    assert_eq!(
        termination.creditor_req_end_date,
        chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    );

    store.reset_stats();
    let store = import(&snapshot(""), store);
    assert!(store.termination_started_of(company_id).unwrap().is_none());
    assert_eq!(store.stats().soft_deletes, 1);
}

#[test]
fn test_dropped_assignee_is_soft_deleted() {
    let with_assignee = snapshot(
        "<ASSIGNEES>\
           <ASSIGNEE>\
             <NAME>ТОВ НАСТУПНИК</NAME>\
             <CODE>99999999</CODE>\
           </ASSIGNEE>\
         </ASSIGNEES>",
    );
    let mut store = import(&with_assignee, MemoryStorage::new());

    let company_id = store
        .find_company_by_code(ROMASHKA_CODE)
        .unwrap()
        .unwrap()
        .id
        .unwrap();
    let assignees = store.assignees_of(company_id).unwrap();
    assert_eq!(assignees.len(), 1);
    assert_eq!(assignees[0].name.as_deref(), Some("тов наступник"));

    store.reset_stats();
    let store = import(&snapshot(""), store);
    assert!(store.assignees_of(company_id).unwrap().is_empty());
    assert_eq!(store.stats().soft_deletes, 1);
}

#[test]
fn test_beneficiary_merges_onto_matching_founder() {
    let with_beneficiary = snapshot(
        "<BENEFICIARIES>\
           <BENEFICIARY>ІВАНОВ ІВАН ІВАНОВИЧ; УКРАЇНА; м. Київ, вул. Банкова 1</BENEFICIARY>\
         </BENEFICIARIES>",
    );
    let store = import(&with_beneficiary, MemoryStorage::new());

    let company_id = store
        .find_company_by_code(ROMASHKA_CODE)
        .unwrap()
        .unwrap()
        .id
        .unwrap();

    // one shared row, not one per pass
    let founders = store.founders_of(company_id).unwrap();
    assert_eq!(founders.len(), 1);
    let row = &founders[0];
    assert!(row.is_founder);
    assert!(row.is_beneficiary);
    assert_eq!(row.country.as_deref(), Some("україна"));
    assert_eq!(row.address.as_deref(), Some("м. Київ, вул. Банкова 1"));

    // a later run must not duplicate the row either
    let store = import(&with_beneficiary, store);
    assert_eq!(store.founders_of(company_id).unwrap().len(), 1);
}

#[test]
fn test_beneficiary_without_founder_gets_own_row() {
    let with_beneficiary = snapshot(
        "<BENEFICIARIES>\
           <BENEFICIARY>ПЕТРОВА МАРІЯ; УКРАЇНА; м. Львів, пл. Ринок 1</BENEFICIARY>\
         </BENEFICIARIES>",
    );
    let store = import(&with_beneficiary, MemoryStorage::new());

    let company_id = store
        .find_company_by_code(ROMASHKA_CODE)
        .unwrap()
        .unwrap()
        .id
        .unwrap();
    let founders = store.founders_of(company_id).unwrap();
    assert_eq!(founders.len(), 2);

    let beneficiary = founders
        .iter()
        .find(|f| f.name.as_deref() == Some("петрова марія"))
        .expect("beneficiary row created");
    assert!(beneficiary.is_beneficiary);
    assert!(!beneficiary.is_founder);

    // the beneficiary pass never retires rows, so a snapshot without the
    // section keeps the row until the founders pass drops it
    let store = import(&with_beneficiary, store);
    assert_eq!(store.founders_of(company_id).unwrap().len(), 2);
}

#[test]
fn test_signer_change_is_insert_plus_retirement() {
    let mut store = import(&snapshot(""), MemoryStorage::new());
    store.reset_stats();

    let renamed = snapshot("").replace("ПЕТРЕНКО ПЕТРО ПЕТРОВИЧ", "СИДОРЕНКО ОЛЕНА");
    let store = import(&renamed, store);

    let company_id = store
        .find_company_by_code(ROMASHKA_CODE)
        .unwrap()
        .unwrap()
        .id
        .unwrap();
    let signers = store.signers_of(company_id).unwrap();
    assert_eq!(signers.len(), 1);
    assert_eq!(signers[0].name, "сидоренко олена");
    assert_eq!(store.stats().inserts, 1);
    assert_eq!(store.stats().soft_deletes, 1);
}
