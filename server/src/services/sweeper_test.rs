use super::*;
use crate::services::invitation::{InvitationStatus, NewInvitation};
use access::Role;
use time::OffsetDateTime;

fn invite(ledger: &InvitationLedger, created_at: OffsetDateTime) -> uuid::Uuid {
    ledger
        .create_at(
            NewInvitation {
                name: "Bob".to_owned(),
                email: "bob@example.com".to_owned(),
                role: Role::Investor,
                project_id: None,
                created_by: "admin@example.com".to_owned(),
            },
            created_at,
        )
        .unwrap()
        .id
}

#[test]
fn sweep_once_reports_expired_count() {
    let ledger = InvitationLedger::new(time::Duration::hours(72));
    let stale = invite(&ledger, OffsetDateTime::now_utc() - time::Duration::hours(100));
    let live = invite(&ledger, OffsetDateTime::now_utc());

    assert_eq!(sweep_once(&ledger), 1);
    assert_eq!(sweep_once(&ledger), 0);
    assert_eq!(ledger.get(stale).unwrap().status, InvitationStatus::Expired);
    assert_eq!(ledger.get(live).unwrap().status, InvitationStatus::Pending);
}

#[tokio::test]
async fn spawned_task_sweeps_on_interval() {
    let ledger = InvitationLedger::new(time::Duration::hours(72));
    let stale = invite(&ledger, OffsetDateTime::now_utc() - time::Duration::hours(100));

    let handle = spawn_sweeper_task(ledger.clone(), Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.abort();

    assert_eq!(ledger.get(stale).unwrap().status, InvitationStatus::Expired);
}
