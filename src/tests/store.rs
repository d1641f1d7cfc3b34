use super::support::TestDb;
use crate::store::{RecordStore, StoreError};

fn ids<T>(rows: &[T], id: impl Fn(&T) -> i64) -> Vec<i64> {
    rows.iter().map(id).collect()
}

#[test]
fn test_live_users_skip_soft_deleted_rows() {
    let db = TestDb::seeded();
    let users = db.store().live_users().unwrap();

    // 5 is deleted, 6 sits on a deleted transport
    assert_eq!(ids(&users, |u| u.id), vec![1, 2, 3, 4]);
}

#[test]
fn test_live_users_carry_transport() {
    let db = TestDb::seeded();
    let users = db.store().live_users().unwrap();

    let seller = users.iter().find(|u| u.login == "seller").unwrap();
    assert_eq!(seller.dominio, 2);
    assert_eq!(seller.transport.id, 2);
    assert_eq!(seller.transport.domain, "ventas.example");
    assert_eq!(seller.transport.transport, "smtp:[relay.example]");
    assert_eq!(seller.quota, Some(1024));
    assert_eq!(seller.userid.as_deref(), Some("u4"));
}

#[test]
fn test_live_aliases_skip_soft_deleted_rows() {
    let db = TestDb::seeded();
    let aliases = db.store().live_aliases().unwrap();
    assert_eq!(ids(&aliases, |a| a.id), vec![1, 2, 3]);
}

#[test]
fn test_find_users_is_case_insensitive_substring() {
    let db = TestDb::seeded();
    let store = db.store();

    let lower = store.find_users("ops").unwrap();
    let upper = store.find_users("OPS").unwrap();

    assert_eq!(ids(&lower, |u| u.id), vec![1, 2]);
    assert_eq!(ids(&upper, |u| u.id), vec![1, 2]);
}

#[test]
fn test_find_folds_non_ascii_case() {
    let db = TestDb::seeded();
    db.add_user(20, "JOSÉ.NÚÑEZ", "Técnico", "Dirección", 1);
    db.add_alias(20, "ÑANDÚ@example.com", "josé.núñez@example.com");
    let store = db.store();

    assert_eq!(ids(&store.find_users("josé").unwrap(), |u| u.id), vec![20]);
    assert_eq!(ids(&store.find_users("JOSÉ").unwrap(), |u| u.id), vec![20]);
    assert_eq!(ids(&store.find_users("núñez").unwrap(), |u| u.id), vec![20]);
    assert_eq!(ids(&store.find_users("TÉCNICO").unwrap(), |u| u.id), vec![20]);
    assert_eq!(ids(&store.find_users("dirección").unwrap(), |u| u.id), vec![20]);

    assert_eq!(ids(&store.find_aliases("ñandú").unwrap(), |a| a.id), vec![20]);
    assert_eq!(ids(&store.find_aliases("NÚÑEZ").unwrap(), |a| a.id), vec![20]);
}

#[test]
fn test_find_users_matches_every_text_field() {
    let db = TestDb::seeded();
    let store = db.store();

    // grupo
    assert_eq!(ids(&store.find_users("sales").unwrap(), |u| u.id), vec![4]);
    // identificacion
    assert_eq!(ids(&store.find_users("engineer").unwrap(), |u| u.id), vec![3]);
    // maildir
    assert_eq!(
        ids(&store.find_users("/var/mail/neteng").unwrap(), |u| u.id),
        vec![3]
    );
    // transport domain
    assert_eq!(
        ids(&store.find_users("ventas.example").unwrap(), |u| u.id),
        vec![4]
    );
}

#[test]
fn test_find_users_never_returns_deleted() {
    let db = TestDb::seeded();
    let store = db.store();

    assert!(store.find_users("ghost").unwrap().is_empty());
    assert!(store.find_users("orphan").unwrap().is_empty());
}

#[test]
fn test_find_treats_wildcards_literally() {
    let db = TestDb::seeded();
    let store = db.store();

    assert!(store.find_users("%").unwrap().is_empty());
    assert!(store.find_aliases("_").unwrap().is_empty());

    db.add_alias(10, "100%@example.com", "promo@example.com");
    let hits = store.find_aliases("100%").unwrap();
    assert_eq!(ids(&hits, |a| a.id), vec![10]);
}

#[test]
fn test_empty_needle_matches_all_live_rows() {
    let db = TestDb::seeded();
    let store = db.store();

    assert_eq!(ids(&store.find_users("").unwrap(), |u| u.id), vec![1, 2, 3, 4]);
    assert_eq!(ids(&store.find_aliases("").unwrap(), |a| a.id), vec![1, 2, 3]);
}

#[test]
fn test_find_aliases_matches_local_and_remoto() {
    let db = TestDb::seeded();
    let store = db.store();

    assert_eq!(ids(&store.find_aliases("soporte").unwrap(), |a| a.id), vec![2]);
    assert_eq!(ids(&store.find_aliases("helpdesk").unwrap(), |a| a.id), vec![2]);
    // only the deleted alias points at sales-old
    assert!(store.find_aliases("sales-old").unwrap().is_empty());
}

#[test]
fn test_writes_are_visible_without_restart() {
    let db = TestDb::seeded();
    let store = db.store();
    assert!(store.find_users("newbie").unwrap().is_empty());

    db.add_user(7, "newbie", "", "infra", 1);
    assert_eq!(ids(&store.find_users("newbie").unwrap(), |u| u.id), vec![7]);
}

#[test]
fn test_missing_table_is_query_error() {
    let db = TestDb::new();
    db.conn().execute_batch("DROP TABLE aliases").unwrap();

    let result = db.store().live_aliases();
    assert!(matches!(result, Err(StoreError::Query(_))));
}
