//! Lifecycle coverage for service requests.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn submitted() -> ServiceRequest {
    ServiceRequest::restore(ServiceRequestRecord {
        id: RequestId::new(10),
        requester: UserId::new(1),
        title: "Battery dead".to_owned(),
        description: "Won't start".to_owned(),
        vehicle: Some("Swift".to_owned()),
        service_type: None,
        location: Coordinates::try_new(28.70, 77.10).expect("finite"),
        status: RequestStatus::Submitted,
        assigned_mechanic: None,
        mechanic_response: None,
        created_at: Utc::now(),
    })
    .expect("consistent record")
}

#[rstest]
fn assign_sets_pending_and_mechanic(mut submitted: ServiceRequest) {
    submitted.assign(UserId::new(7));
    assert_eq!(submitted.status(), RequestStatus::Pending);
    assert_eq!(submitted.assigned_mechanic(), Some(UserId::new(7)));
}

#[rstest]
fn reassignment_replaces_previous_mechanic(mut submitted: ServiceRequest) {
    submitted.assign(UserId::new(7));
    submitted.respond(RequestAction::Accept, None);
    submitted.assign(UserId::new(8));
    assert_eq!(submitted.status(), RequestStatus::Pending);
    assert_eq!(submitted.assigned_mechanic(), Some(UserId::new(8)));
}

#[rstest]
#[case(RequestAction::Accept, RequestStatus::Accepted, true)]
#[case(RequestAction::Reject, RequestStatus::Rejected, false)]
#[case(RequestAction::Start, RequestStatus::Enroute, true)]
#[case(RequestAction::Complete, RequestStatus::Completed, true)]
fn respond_maps_action_to_status(
    mut submitted: ServiceRequest,
    #[case] action: RequestAction,
    #[case] expected: RequestStatus,
    #[case] keeps_mechanic: bool,
) {
    submitted.assign(UserId::new(7));
    submitted.respond(action, None);
    assert_eq!(submitted.status(), expected);
    assert_eq!(submitted.assigned_mechanic().is_some(), keeps_mechanic);
    assert_eq!(
        submitted.status().has_assignee(),
        submitted.assigned_mechanic().is_some()
    );
}

#[rstest]
fn comment_overwrites_only_when_non_blank(mut submitted: ServiceRequest) {
    submitted.assign(UserId::new(7));
    submitted.respond(RequestAction::Accept, Some("On my way in 20"));
    submitted.respond(RequestAction::Start, Some("   "));
    assert_eq!(submitted.mechanic_response(), Some("On my way in 20"));
    submitted.respond(RequestAction::Complete, Some("Replaced battery"));
    assert_eq!(submitted.mechanic_response(), Some("Replaced battery"));
}

#[rstest]
#[case(UserId::new(1), Role::User, true)]
#[case(UserId::new(2), Role::User, false)]
#[case(UserId::new(7), Role::Mechanic, true)]
#[case(UserId::new(8), Role::Mechanic, false)]
#[case(UserId::new(99), Role::Admin, true)]
fn visibility_follows_participation(
    mut submitted: ServiceRequest,
    #[case] viewer: UserId,
    #[case] role: Role,
    #[case] visible: bool,
) {
    submitted.assign(UserId::new(7));
    assert_eq!(submitted.is_visible_to(viewer, role), visible);
}

#[rstest]
#[case(RequestStatus::Pending, None)]
#[case(RequestStatus::Submitted, Some(UserId::new(3)))]
#[case(RequestStatus::Rejected, Some(UserId::new(3)))]
fn restore_rejects_inconsistent_rows(
    submitted: ServiceRequest,
    #[case] status: RequestStatus,
    #[case] assignee: Option<UserId>,
) {
    let mut record = submitted.as_record().clone();
    record.status = status;
    record.assigned_mechanic = assignee;
    let err = ServiceRequest::restore(record).expect_err("inconsistent");
    assert!(matches!(
        err,
        ServiceRequestValidationError::InconsistentAssignment { .. }
    ));
}

#[rstest]
#[case("Submitted", RequestStatus::Submitted)]
#[case("enroute", RequestStatus::Enroute)]
fn status_parses_stored_text(#[case] raw: &str, #[case] expected: RequestStatus) {
    assert_eq!(raw.parse::<RequestStatus>(), Ok(expected));
}

#[rstest]
fn unknown_action_is_rejected() {
    assert_eq!(
        "dance".parse::<RequestAction>(),
        Err(ServiceRequestValidationError::UnknownAction("dance".to_owned()))
    );
}

#[rstest]
fn draft_requires_title_and_finite_location() {
    assert_eq!(
        ServiceRequestDraft::try_new(" ", "", None, None, 1.0, 1.0),
        Err(ServiceRequestValidationError::EmptyTitle)
    );
    assert_eq!(
        ServiceRequestDraft::try_new("Tow", "", None, None, f64::NAN, 1.0),
        Err(ServiceRequestValidationError::Location(
            CoordinateError::NonFiniteLatitude
        ))
    );
}
