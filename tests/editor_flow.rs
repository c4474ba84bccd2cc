//! Editor workflow tests against in-memory backend and host

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use travelpack::error::GENERIC_SAVE_ERROR;
use travelpack::{
    Destination, DestinationId, Itinerary, ItineraryPayload, Package, PackageBackend,
    PackageDraft, PackageEditor, PackageError, PackageHost, PackageId, Phase, Place, PlaceId,
    SubmitOutcome,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Places(DestinationId),
    ReadItinerary(PackageId),
    Save(PackageDraft),
    Insert(ItineraryPayload),
    Update(ItineraryPayload),
    Close,
}

type CallLog = Arc<Mutex<Vec<Call>>>;

#[derive(Default)]
struct FakeBackend {
    log: CallLog,
    places: HashMap<DestinationId, Vec<Place>>,
    itineraries: Vec<Itinerary>,
    fail_places: bool,
    fail_itinerary_read: bool,
    fail_itinerary_write: Option<String>,
}

impl FakeBackend {
    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }

    fn write_result(&self) -> travelpack::Result<()> {
        match &self.fail_itinerary_write {
            Some(message) => Err(PackageError::backend(400, message.clone())),
            None => Ok(()),
        }
    }
}

impl PackageBackend for FakeBackend {
    async fn places_for_destination(
        &self,
        destination_id: DestinationId,
    ) -> travelpack::Result<Vec<Place>> {
        self.record(Call::Places(destination_id));
        if self.fail_places {
            return Err(PackageError::network("connection refused"));
        }
        Ok(self.places.get(&destination_id).cloned().unwrap_or_default())
    }

    async fn itinerary_for_package(
        &self,
        package_id: PackageId,
    ) -> travelpack::Result<Vec<Itinerary>> {
        self.record(Call::ReadItinerary(package_id));
        if self.fail_itinerary_read {
            return Err(PackageError::backend(500, "internal error"));
        }
        Ok(self
            .itineraries
            .iter()
            .filter(|i| i.package_id == package_id)
            .cloned()
            .collect())
    }

    async fn insert_itinerary(&self, itinerary: &ItineraryPayload) -> travelpack::Result<()> {
        self.record(Call::Insert(itinerary.clone()));
        self.write_result()
    }

    async fn update_itinerary(&self, itinerary: &ItineraryPayload) -> travelpack::Result<()> {
        self.record(Call::Update(itinerary.clone()));
        self.write_result()
    }
}

struct FakeHost {
    log: CallLog,
    assigned_id: PackageId,
    fail: Option<String>,
}

impl FakeHost {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            assigned_id: PackageId(100),
            fail: None,
        }
    }
}

impl PackageHost for FakeHost {
    async fn save_package(&self, draft: PackageDraft) -> travelpack::Result<Package> {
        self.log.lock().unwrap().push(Call::Save(draft.clone()));
        if let Some(message) = &self.fail {
            return Err(PackageError::save(message.clone()));
        }
        Ok(Package {
            id: draft.id.unwrap_or(self.assigned_id),
            destination_id: draft.destination_id,
            title: draft.title,
            description: draft.description,
            duration: draft.duration,
            price: draft.price,
            rating: draft.rating,
            image_url: draft.image_url,
            created_at: None,
        })
    }

    fn close(&self) {
        self.log.lock().unwrap().push(Call::Close);
    }
}

fn destinations() -> Vec<Destination> {
    vec![
        Destination {
            id: DestinationId(1),
            name: "Lisbon".to_string(),
        },
        Destination {
            id: DestinationId(3),
            name: "Crete".to_string(),
        },
    ]
}

fn place(id: i64, destination: i64, name: &str) -> Place {
    Place {
        id: PlaceId(id),
        name: name.to_string(),
        image_url: String::new(),
        destination_id: Some(DestinationId(destination)),
    }
}

fn backend_with_places(log: &CallLog) -> FakeBackend {
    let mut places = HashMap::new();
    places.insert(
        DestinationId(1),
        vec![place(10, 1, "Belem Tower"), place(11, 1, "Alfama")],
    );
    places.insert(DestinationId(3), vec![place(30, 3, "Knossos")]);
    FakeBackend {
        log: log.clone(),
        places,
        ..FakeBackend::default()
    }
}

fn existing_package() -> Package {
    Package {
        id: PackageId(42),
        destination_id: DestinationId(3),
        title: "Crete in three days".to_string(),
        description: "Ruins and beaches".to_string(),
        duration: 3,
        price: 640.0,
        rating: 4.7,
        image_url: "https://img.example/crete.jpg".to_string(),
        created_at: None,
    }
}

fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

/// Calls made by the save workflow, without fetches
fn writes(log: &CallLog) -> Vec<Call> {
    calls(log)
        .into_iter()
        .filter(|c| !matches!(c, Call::Places(_) | Call::ReadItinerary(_)))
        .collect()
}

fn fill_three_days<B: PackageBackend, H: PackageHost>(editor: &mut PackageEditor<B, H>) {
    let form = editor.form_mut();
    form.set_title("Lisbon weekend");
    form.set_description("Trams and pastries");
    form.set_price("320.50");
    form.set_duration("3");
    form.set_day(0, "Arrival and Alfama walk");
    form.set_day(1, "Belem");
    form.set_day(2, "Sintra day trip");
}

#[tokio::test]
async fn test_create_saves_package_then_inserts_itinerary() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.mount().await;
    assert!(calls(&log).is_empty());

    editor.select_destination(Some(DestinationId(1))).await;
    assert_eq!(editor.form().places().len(), 2);
    fill_three_days(&mut editor);

    let outcome = editor.submit().await;

    let SubmitOutcome::Saved(package) = &outcome else {
        panic!("expected a saved package, got {outcome:?}");
    };
    assert_eq!(package.id, PackageId(100));

    let writes = writes(&log);
    assert_eq!(writes.len(), 3);
    let Call::Save(draft) = &writes[0] else {
        panic!("first write should be the package save: {writes:?}");
    };
    assert!(draft.id.is_none());
    assert_eq!(draft.duration, 3);
    assert_eq!(draft.price, 320.5);
    assert_eq!(draft.rating, 0.0);
    assert_eq!(
        writes[1],
        Call::Insert(ItineraryPayload {
            package_id: PackageId(100),
            days: 3,
            descriptions: vec![
                "Arrival and Alfama walk".to_string(),
                "Belem".to_string(),
                "Sintra day trip".to_string(),
            ],
        })
    );
    assert_eq!(writes[2], Call::Close);

    assert_eq!(editor.form().phase(), Phase::Closed);
    assert!(editor.form().error().is_none());
}

#[tokio::test]
async fn test_edit_loads_itinerary_and_updates_by_package_id() {
    let log = CallLog::default();
    let mut backend = backend_with_places(&log);
    backend.itineraries.push(Itinerary {
        id: Some(7),
        package_id: PackageId(42),
        days: 3,
        descriptions: vec!["Heraklion".into(), "Knossos".into(), "Elafonissi".into()],
    });
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), Some(existing_package()));
    editor.mount().await;

    let fetched = calls(&log);
    assert!(fetched.contains(&Call::Places(DestinationId(3))));
    assert!(fetched.contains(&Call::ReadItinerary(PackageId(42))));
    assert_eq!(editor.form().places().len(), 1);
    assert_eq!(
        editor.form().itinerary(),
        ["Heraklion".to_string(), "Knossos".to_string(), "Elafonissi".to_string()]
    );
    assert!(!editor.form().is_loading());

    editor.form_mut().set_day(2, "Balos lagoon");
    let outcome = editor.submit().await;
    assert!(outcome.is_saved());

    let writes = writes(&log);
    let Call::Save(draft) = &writes[0] else {
        panic!("first write should be the package save: {writes:?}");
    };
    assert_eq!(draft.id, Some(PackageId(42)));
    assert_eq!(draft.rating, 4.7);
    let Call::Update(payload) = &writes[1] else {
        panic!("second write should be an itinerary update: {writes:?}");
    };
    assert_eq!(payload.package_id, PackageId(42));
    assert_eq!(payload.descriptions[2], "Balos lagoon");
    assert!(!writes.iter().any(|c| matches!(c, Call::Insert(_))));
}

#[tokio::test]
async fn test_missing_destination_never_calls_save() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.mount().await;
    fill_three_days(&mut editor);

    let outcome = editor.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected("Please select a destination".to_string())
    );
    assert!(writes(&log).is_empty());
    assert!(!editor.form().is_busy());
    assert_eq!(editor.form().error(), Some("Please select a destination"));
}

#[tokio::test]
async fn test_blank_itinerary_day_never_calls_save() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;
    fill_three_days(&mut editor);
    editor.form_mut().set_day(1, "  ");

    let outcome = editor.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Rejected(ref m) if m.contains("day 2")));
    assert!(writes(&log).is_empty());
    assert_eq!(editor.form().phase(), Phase::Idle);
}

#[tokio::test]
async fn test_save_rejection_skips_itinerary_write() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let mut host = FakeHost::new(log.clone());
    host.fail = Some("duplicate package title".to_string());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;
    fill_three_days(&mut editor);

    let outcome = editor.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected("duplicate package title".to_string())
    );
    let writes = writes(&log);
    assert_eq!(writes.len(), 1);
    assert!(matches!(writes[0], Call::Save(_)));
    assert!(!editor.form().is_busy());
    assert!(!editor.form().is_closed());
    assert_eq!(editor.form().error(), Some("duplicate package title"));
}

#[tokio::test]
async fn test_blank_save_error_uses_generic_message() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let mut host = FakeHost::new(log.clone());
    host.fail = Some(String::new());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;
    fill_three_days(&mut editor);

    assert_eq!(
        editor.submit().await,
        SubmitOutcome::Rejected(GENERIC_SAVE_ERROR.to_string())
    );
}

#[tokio::test]
async fn test_itinerary_write_failure_keeps_editor_open() {
    let log = CallLog::default();
    let mut backend = backend_with_places(&log);
    backend.fail_itinerary_write = Some("itineraries violates not-null constraint".to_string());
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;
    fill_three_days(&mut editor);

    let outcome = editor.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    let writes = writes(&log);
    assert!(matches!(writes[0], Call::Save(_)));
    assert!(matches!(writes[1], Call::Insert(_)));
    assert!(!writes.contains(&Call::Close));
    assert!(!editor.form().is_closed());
    assert_eq!(
        editor.form().error(),
        Some("itineraries violates not-null constraint")
    );

    // resubmitting saves the package a second time
    assert!(matches!(editor.submit().await, SubmitOutcome::Rejected(_)));
    let saves = writes_of(&log, |c| matches!(c, Call::Save(_)));
    assert_eq!(saves, 2);
}

fn writes_of(log: &CallLog, pred: impl Fn(&Call) -> bool) -> usize {
    writes(log).iter().filter(|c| pred(c)).count()
}

#[tokio::test]
async fn test_place_fetch_failure_is_silent() {
    let log = CallLog::default();
    let mut backend = backend_with_places(&log);
    backend.fail_places = true;
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;

    assert!(editor.form().places().is_empty());
    assert!(editor.form().error().is_none());
    assert!(!editor.form().is_loading());
}

#[tokio::test]
async fn test_itinerary_fetch_failure_keeps_derived_days() {
    let log = CallLog::default();
    let mut backend = backend_with_places(&log);
    backend.fail_itinerary_read = true;
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), Some(existing_package()));
    editor.mount().await;

    assert_eq!(editor.form().itinerary().len(), 3);
    assert!(editor.form().itinerary().iter().all(String::is_empty));
    assert!(editor.form().error().is_none());
}

#[tokio::test]
async fn test_destination_change_reloads_places_only_when_changed() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;
    editor.toggle_place(PlaceId(10));
    editor.select_destination(Some(DestinationId(1))).await;
    assert!(editor.form().is_place_selected(PlaceId(10)));

    editor.select_destination(Some(DestinationId(3))).await;
    assert_eq!(editor.form().places()[0].name, "Knossos");
    assert!(editor.form().selected_places().is_empty());

    assert_eq!(
        calls(&log),
        vec![Call::Places(DestinationId(1)), Call::Places(DestinationId(3))]
    );
}

#[tokio::test]
async fn test_toggling_place_twice_restores_selection() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;
    editor.toggle_place(PlaceId(11));
    let before = editor.form().selected_places().clone();

    assert!(editor.toggle_place(PlaceId(10)));
    assert!(!editor.toggle_place(PlaceId(10)));

    assert_eq!(editor.form().selected_places(), &before);
}

#[tokio::test]
async fn test_submit_after_close_is_ignored() {
    let log = CallLog::default();
    let backend = backend_with_places(&log);
    let host = FakeHost::new(log.clone());

    let mut editor = PackageEditor::open(&backend, &host, destinations(), None);
    editor.select_destination(Some(DestinationId(1))).await;
    fill_three_days(&mut editor);
    assert!(editor.submit().await.is_saved());

    assert_eq!(editor.submit().await, SubmitOutcome::Ignored);
    assert_eq!(writes_of(&log, |c| matches!(c, Call::Save(_))), 1);
}
