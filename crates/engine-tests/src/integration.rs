#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use engine::context::FetchContext;
    use engine::error::{FetchError, WriteError};
    use engine::fetch::FetchRequest;
    use engine::readers;
    use engine::selection::SourceSelection;
    use engine::writers::{AlarmWriter, EventWriter, MeasurementWriter};
    use model::fetch::time::UPPER_BOUND_SKEW_MS;
    use model::fetch::{RowBudget, TimeRange};
    use model::table::Cell;
    use platform::dto::{AlarmDto, EventDto, MeasurementDto};
    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    use crate::utils::{
        ANY_SOURCE, ScriptedCollection, ScriptedCreateApi, alarm, cell, device,
        empty_measurement, event, input_table, measurement, remote_failure, run_fetch,
        sparse_alarm,
    };
    use crate::{GATEWAY, PUMP, VALVE};

    fn request(selection: SourceSelection, range: TimeRange, limit: Option<i64>) -> FetchRequest {
        FetchRequest {
            selection,
            range,
            budget: RowBudget::from_limit(limit),
        }
    }

    fn two_device_alarms() -> ScriptedCollection<AlarmDto> {
        ScriptedCollection::new()
            .with_page(
                PUMP,
                Ok(vec![
                    alarm("a1", Some((PUMP, "Pump 7"))),
                    alarm("a2", Some((PUMP, "Pump 7"))),
                ]),
            )
            .with_page(VALVE, Ok(vec![alarm("a3", Some((VALVE, "Valve 2")))]))
    }

    // Test Settings: two devices selected, no time range, no row limit.
    // Scenario: Each device answers with one short alarm page.
    // Expected Outcome:
    // - All alarm rows arrive in selection order.
    // - Both sources are visited and no date predicate is sent.
    #[traced_test]
    #[tokio::test]
    async fn tc01() {
        let pages = two_device_alarms();

        let (result, table) = run_fetch(
            readers::alarms::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP, VALVE]),
                TimeRange::unbounded(),
                None,
            ),
            &FetchContext::detached(),
        )
        .await;

        let report = result.unwrap();
        assert_eq!(report.rows_emitted, 3);
        assert_eq!(report.sources_visited, 2);
        assert_eq!(report.failure, None);
        assert!(!report.is_partial());

        let table = table.unwrap();
        assert_eq!(table.schema().width(), 11);
        assert_eq!(cell(&table, 0, "Alarm ID"), &Cell::from("a1"));
        assert_eq!(cell(&table, 0, "Severity"), &Cell::from("MAJOR"));
        assert_eq!(cell(&table, 2, "Alarm ID"), &Cell::from("a3"));
        assert_eq!(cell(&table, 2, "Source ID"), &Cell::from(VALVE));

        assert_eq!(
            pages.queried_sources(),
            vec![Some(PUMP.to_string()), Some(VALVE.to_string())]
        );
        assert!(pages.calls().iter().all(|call| call.window.is_none()));
    }

    // Test Settings: row limit zero.
    // Scenario: Zero is the "no limit" sentinel, not an empty result request.
    // Expected Outcome: Every row is fetched as if no limit was set.
    #[traced_test]
    #[tokio::test]
    async fn tc02() {
        let pages = two_device_alarms();

        let (result, table) = run_fetch(
            readers::alarms::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP, VALVE]),
                TimeRange::unbounded(),
                Some(0),
            ),
            &FetchContext::detached(),
        )
        .await;

        assert_eq!(result.unwrap().rows_emitted, 3);
        assert_eq!(table.unwrap().len(), 3);
    }

    // Test Settings: row limit 1 over two selected devices.
    // Scenario: The first device alone already satisfies the budget.
    // Expected Outcome: Exactly one row; the second device is never queried.
    #[traced_test]
    #[tokio::test]
    async fn tc03() {
        let pages = two_device_alarms();

        let (result, table) = run_fetch(
            readers::alarms::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP, VALVE]),
                TimeRange::unbounded(),
                Some(1),
            ),
            &FetchContext::detached(),
        )
        .await;

        let report = result.unwrap();
        assert_eq!(report.rows_emitted, 1);
        assert_eq!(report.sources_visited, 1);
        assert_eq!(table.unwrap().len(), 1);
        assert_eq!(pages.queried_sources(), vec![Some(PUMP.to_string())]);
    }

    // Test Settings: row limit 5 over two devices with 3 and 4 alarms.
    // Scenario: The budget runs out in the middle of the second device.
    // Expected Outcome: 3 rows from the first device, 2 from the second,
    // nothing beyond the cap.
    #[traced_test]
    #[tokio::test]
    async fn tc04() {
        let pages = ScriptedCollection::new()
            .with_page(
                PUMP,
                Ok(vec![
                    alarm("a1", Some((PUMP, "Pump 7"))),
                    alarm("a2", Some((PUMP, "Pump 7"))),
                    alarm("a3", Some((PUMP, "Pump 7"))),
                ]),
            )
            .with_page(
                VALVE,
                Ok(vec![
                    alarm("b1", Some((VALVE, "Valve 2"))),
                    alarm("b2", Some((VALVE, "Valve 2"))),
                    alarm("b3", Some((VALVE, "Valve 2"))),
                    alarm("b4", Some((VALVE, "Valve 2"))),
                ]),
            );

        let (result, table) = run_fetch(
            readers::alarms::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP, VALVE]),
                TimeRange::unbounded(),
                Some(5),
            ),
            &FetchContext::detached(),
        )
        .await;

        let report = result.unwrap();
        assert_eq!(report.rows_emitted, 5);
        assert_eq!(report.sources_visited, 2);

        let table = table.unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(cell(&table, 4, "Alarm ID"), &Cell::from("b2"));
        assert_eq!(
            pages.queried_sources(),
            vec![Some(PUMP.to_string()), Some(VALVE.to_string())]
        );
    }

    // Test Settings: row limit 2, one measurement carrying three series.
    // Scenario: A single item fans out into more rows than the budget allows.
    // Expected Outcome: The cap is strict; the item's third row is dropped.
    #[traced_test]
    #[tokio::test]
    async fn tc05() {
        let pages = ScriptedCollection::new().with_page(
            PUMP,
            Ok(vec![measurement(
                "m1",
                PUMP,
                &[
                    ("c8y_Steam", "Pressure", 1.2, "bar"),
                    ("c8y_Steam", "Temperature", 98.6, "C"),
                    ("c8y_Water", "Flow", 3.4, "l/min"),
                ],
            )]),
        );

        let (result, table) = run_fetch(
            readers::measurements::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP]),
                TimeRange::unbounded(),
                Some(2),
            ),
            &FetchContext::detached(),
        )
        .await;

        assert_eq!(result.unwrap().rows_emitted, 2);

        let table = table.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(cell(&table, 0, "Fragment Series"), &Cell::from("Pressure"));
        assert_eq!(
            cell(&table, 1, "Fragment Series"),
            &Cell::from("Temperature")
        );
        assert_eq!(cell(&table, 1, "Value"), &Cell::Float(98.6));
    }

    // Test Settings: three devices selected, no limits.
    // Scenario: The second device's collection request fails remotely after
    // the first device already produced rows.
    // Expected Outcome:
    // - The run ends as a partial result, not an error.
    // - The failure's root cause is carried in the report.
    // - The third device is never attempted.
    #[traced_test]
    #[tokio::test]
    async fn tc06() {
        let pages = ScriptedCollection::new()
            .with_page(
                PUMP,
                Ok(vec![
                    alarm("a1", Some((PUMP, "Pump 7"))),
                    alarm("a2", Some((PUMP, "Pump 7"))),
                ]),
            )
            .with_page(VALVE, Err(remote_failure(500, "boom")))
            .with_page(GATEWAY, Ok(vec![alarm("c1", Some((GATEWAY, "Gateway")))]));

        let (result, table) = run_fetch(
            readers::alarms::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP, VALVE, GATEWAY]),
                TimeRange::unbounded(),
                None,
            ),
            &FetchContext::detached(),
        )
        .await;

        let report = result.unwrap();
        assert!(report.is_partial());
        assert_eq!(report.rows_emitted, 2);
        assert_eq!(report.sources_visited, 1);
        assert_eq!(
            report.failure.as_deref(),
            Some("Platform request failed with status 500: boom")
        );

        assert_eq!(table.unwrap().len(), 2);
        assert_eq!(
            pages.queried_sources(),
            vec![Some(PUMP.to_string()), Some(VALVE.to_string())]
        );
    }

    // Test Settings: unfiltered fetch, no limits.
    // Scenario: The very first collection request fails; no row was emitted.
    // Expected Outcome: The run is an error, and the sink still ends up
    // opened and closed with an empty table.
    #[traced_test]
    #[tokio::test]
    async fn tc07() {
        let pages: ScriptedCollection<AlarmDto> =
            ScriptedCollection::new().with_page(ANY_SOURCE, Err(remote_failure(500, "boom")));

        let (result, table) = run_fetch(
            readers::alarms::profile(),
            &pages,
            request(SourceSelection::All, TimeRange::unbounded(), None),
            &FetchContext::detached(),
        )
        .await;

        assert!(matches!(result, Err(FetchError::Platform(_))));
        assert_eq!(table.unwrap().len(), 0);
    }

    // Test Settings: no devices given.
    // Scenario: An empty selection means the whole collection, fetched in a
    // single unfiltered pass.
    // Expected Outcome: One request without a source parameter, all device
    // rows present.
    #[traced_test]
    #[tokio::test]
    async fn tc08() {
        let pages = ScriptedCollection::new().with_page(
            ANY_SOURCE,
            Ok(vec![device(PUMP, "Pump 7"), device(VALVE, "Valve 2")]),
        );

        let (result, table) = run_fetch(
            readers::devices::profile(),
            &pages,
            request(
                SourceSelection::from_ids(Vec::<String>::new()),
                TimeRange::unbounded(),
                None,
            ),
            &FetchContext::detached(),
        )
        .await;

        let report = result.unwrap();
        assert_eq!(report.rows_emitted, 2);
        assert_eq!(report.sources_visited, 1);

        let table = table.unwrap();
        assert_eq!(table.schema().width(), 3);
        assert_eq!(cell(&table, 0, "Device ID"), &Cell::from(PUMP));
        assert_eq!(cell(&table, 1, "Device Name"), &Cell::from("Valve 2"));
        assert_eq!(pages.queried_sources(), vec![None]);
    }

    // Test Settings: explicit time range bounds.
    // Scenario: A closed range is passed through as-is; an open upper bound
    // is widened past "now" to cover clock skew.
    // Expected Outcome: The collection sees the resolved window, identical
    // for every request of the run.
    #[traced_test]
    #[tokio::test]
    async fn tc09() {
        let from = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let closed = ScriptedCollection::new().with_page(PUMP, Ok(vec![event("e1", PUMP)]));
        let (result, _) = run_fetch(
            readers::events::profile(),
            &closed,
            request(
                SourceSelection::from_ids([PUMP]),
                TimeRange::new(Some(from), Some(to)).unwrap(),
                None,
            ),
            &FetchContext::detached(),
        )
        .await;
        result.unwrap();
        assert_eq!(closed.calls()[0].window, Some((from, to)));

        let open_end = ScriptedCollection::new().with_page(PUMP, Ok(vec![event("e2", PUMP)]));
        let start = Utc::now();
        let (result, _) = run_fetch(
            readers::events::profile(),
            &open_end,
            request(
                SourceSelection::from_ids([PUMP]),
                TimeRange::new(Some(from), None).unwrap(),
                None,
            ),
            &FetchContext::detached(),
        )
        .await;
        result.unwrap();

        let (lower, upper) = open_end.calls()[0].window.unwrap();
        assert_eq!(lower, from);
        assert!(upper >= start + Duration::milliseconds(UPPER_BOUND_SKEW_MS));
    }

    // Test Settings: no limits, shutdown requested while the second page is
    // in flight.
    // Scenario: The run must stop where it is instead of draining the
    // collection.
    // Expected Outcome: Cancellation error, the first page's rows are kept,
    // no page beyond the second is requested.
    #[traced_test]
    #[tokio::test]
    async fn tc10() {
        let token = CancellationToken::new();
        let first_page: Vec<EventDto> = (0..100).map(|ix| event(&format!("e{ix}"), PUMP)).collect();
        let pages = ScriptedCollection::new()
            .with_page(PUMP, Ok(first_page))
            .with_page(PUMP, Ok(vec![event("tail", PUMP)]))
            .cancelling_after(2, token.clone());

        let (result, table) = run_fetch(
            readers::events::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP]),
                TimeRange::unbounded(),
                None,
            ),
            &FetchContext::new(token),
        )
        .await;

        assert!(matches!(result, Err(FetchError::Cancelled)));
        assert_eq!(table.unwrap().len(), 100);
        assert_eq!(pages.calls().len(), 2);
    }

    // Test Settings: measurements fetch without any device selected.
    // Scenario: Measurements cannot be scanned tenant-wide.
    // Expected Outcome: The run is rejected before anything is opened or
    // requested.
    #[traced_test]
    #[tokio::test]
    async fn tc11() {
        let pages: ScriptedCollection<MeasurementDto> = ScriptedCollection::new();

        let (result, table) = run_fetch(
            readers::measurements::profile(),
            &pages,
            request(SourceSelection::All, TimeRange::unbounded(), None),
            &FetchContext::detached(),
        )
        .await;

        assert!(matches!(
            result,
            Err(FetchError::SourceRequired("measurements"))
        ));
        assert!(table.is_none());
        assert!(pages.calls().is_empty());
    }

    // Test Settings: one device, no limits.
    // Scenario: A full page is followed by a short page.
    // Expected Outcome: Exactly two page requests with increasing page
    // numbers, all rows of both pages emitted.
    #[traced_test]
    #[tokio::test]
    async fn tc12() {
        let first: Vec<EventDto> = (0..100).map(|ix| event(&format!("e{ix}"), PUMP)).collect();
        let second: Vec<EventDto> = (0..40)
            .map(|ix| event(&format!("tail{ix}"), PUMP))
            .collect();
        let pages = ScriptedCollection::new()
            .with_page(PUMP, Ok(first))
            .with_page(PUMP, Ok(second));

        let (result, table) = run_fetch(
            readers::events::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP]),
                TimeRange::unbounded(),
                None,
            ),
            &FetchContext::detached(),
        )
        .await;

        let report = result.unwrap();
        assert_eq!(report.rows_emitted, 140);
        assert_eq!(report.sources_visited, 1);
        assert_eq!(table.unwrap().len(), 140);

        let calls = pages.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].current_page, 1);
        assert_eq!(calls[1].current_page, 2);
        assert!(calls.iter().all(|call| call.page_size == 100));
    }

    // Test Settings: one device, no limits.
    // Scenario: The page mixes a measurement without series data into
    // regular measurements.
    // Expected Outcome: The empty item is counted as ignored, the run's
    // metrics match the report.
    #[traced_test]
    #[tokio::test]
    async fn tc13() {
        let pages = ScriptedCollection::new().with_page(
            PUMP,
            Ok(vec![
                empty_measurement("m0", PUMP),
                measurement(
                    "m1",
                    PUMP,
                    &[
                        ("c8y_Steam", "Pressure", 1.2, "bar"),
                        ("c8y_Steam", "Temperature", 98.6, "C"),
                    ],
                ),
            ]),
        );

        let ctx = FetchContext::detached();
        let (result, _) = run_fetch(
            readers::measurements::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP]),
                TimeRange::unbounded(),
                None,
            ),
            &ctx,
        )
        .await;

        let report = result.unwrap();
        assert_eq!(report.rows_emitted, 2);
        assert_eq!(report.items_ignored, 1);

        let snapshot = ctx.metrics().snapshot();
        assert_eq!(snapshot.rows_emitted, 2);
        assert_eq!(snapshot.items_ignored, 1);
        assert_eq!(snapshot.pages_fetched, 1);
        assert_eq!(snapshot.items_created, 0);
    }

    // Test Settings: one device, no limits.
    // Scenario: A fully populated alarm is directly followed by a barely
    // populated one in the same page.
    // Expected Outcome: The sparse alarm's row carries missing cells; no
    // value leaks over from the previous row.
    #[traced_test]
    #[tokio::test]
    async fn tc14() {
        let pages = ScriptedCollection::new().with_page(
            PUMP,
            Ok(vec![alarm("a1", Some((PUMP, "Pump 7"))), sparse_alarm("a2")]),
        );

        let (result, table) = run_fetch(
            readers::alarms::profile(),
            &pages,
            request(
                SourceSelection::from_ids([PUMP]),
                TimeRange::unbounded(),
                None,
            ),
            &FetchContext::detached(),
        )
        .await;

        assert_eq!(result.unwrap().rows_emitted, 2);

        let table = table.unwrap();
        assert_eq!(cell(&table, 0, "Source ID"), &Cell::from(PUMP));
        assert_eq!(cell(&table, 0, "Source Name"), &Cell::from("Pump 7"));
        assert_eq!(cell(&table, 1, "Alarm ID"), &Cell::from("a2"));
        assert_eq!(cell(&table, 1, "Source ID"), &Cell::Missing);
        assert_eq!(cell(&table, 1, "Source Name"), &Cell::Missing);
        assert_eq!(cell(&table, 1, "Severity"), &Cell::Missing);
        assert_eq!(cell(&table, 1, "Time"), &Cell::Missing);
    }

    // Test Settings: identical scripts, two runs.
    // Scenario: Rerunning the same fetch against unchanged data.
    // Expected Outcome: Reports and tables are equal across the runs.
    #[traced_test]
    #[tokio::test]
    async fn tc15() {
        let selection = SourceSelection::from_ids([PUMP, VALVE]);

        let first_pages = two_device_alarms();
        let (first_result, first_table) = run_fetch(
            readers::alarms::profile(),
            &first_pages,
            request(selection.clone(), TimeRange::unbounded(), None),
            &FetchContext::detached(),
        )
        .await;

        let second_pages = two_device_alarms();
        let (second_result, second_table) = run_fetch(
            readers::alarms::profile(),
            &second_pages,
            request(selection, TimeRange::unbounded(), None),
            &FetchContext::detached(),
        )
        .await;

        assert_eq!(first_result.unwrap(), second_result.unwrap());
        assert_eq!(first_table.unwrap(), second_table.unwrap());
    }

    // Test Settings: three input rows, the second create call fails.
    // Scenario: One bad row must not sink the batch.
    // Expected Outcome:
    // - The remaining rows are still written, in order.
    // - The report carries the counts and the failure's root cause.
    #[traced_test]
    #[tokio::test]
    async fn tc16() {
        let api = ScriptedCreateApi::failing_at(&[1]);
        let table = input_table(
            &["Event Type", "Source ID", "Description", "Time"],
            &[
                &["c8y_DoorOpen", PUMP, "Front door", "2024-03-01T08:00:00.000Z"],
                &["c8y_DoorOpen", VALVE, "Back door", "2024-03-01T08:05:00.000Z"],
                &["c8y_DoorClosed", PUMP, "", "2024-03-01T08:10:00.000Z"],
            ],
        );

        let report = EventWriter::new(&api)
            .write(&table, &FetchContext::detached())
            .await
            .unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.created, 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_created());
        assert_eq!(
            report.failure.as_deref(),
            Some("Platform request failed with status 422: scripted create failure")
        );

        let created = api.created_events();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].kind, "c8y_DoorOpen");
        assert_eq!(created[0].source.id.as_deref(), Some(PUMP));
        assert_eq!(
            created[0].time,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(created[1].kind, "c8y_DoorClosed");
        assert_eq!(created[1].text, None);
    }

    // Test Settings: no time column, free-form severity and status values.
    // Scenario: Input values only loosely resemble the platform's enums.
    // Expected Outcome:
    // - Recognisable values are normalised, unknown ones pass through.
    // - Absent values fall back to WARNING / ACTIVE and the current time.
    #[traced_test]
    #[tokio::test]
    async fn tc17() {
        let api = ScriptedCreateApi::new();
        let table = input_table(
            &["Alarm Type", "Severity", "Status", "Source ID", "Description"],
            &[
                &["c8y_TemperatureAlarm", "minor", "acknowledged", PUMP, "Running hot"],
                &["c8y_TemperatureAlarm", "", "", PUMP, "No severity given"],
                &["c8y_TemperatureAlarm", "blocker", "parked", PUMP, "Unmapped values"],
            ],
        );

        let start = Utc::now();
        let report = AlarmWriter::new(&api)
            .write(&table, &FetchContext::detached())
            .await
            .unwrap();
        assert_eq!(report.created, 3);

        let created = api.created_alarms();
        assert_eq!(created[0].severity, "MINOR");
        assert_eq!(created[0].status, "ACKNOWLEDGED");
        assert_eq!(created[1].severity, "WARNING");
        assert_eq!(created[1].status, "ACTIVE");
        assert_eq!(created[2].severity, "blocker");
        assert_eq!(created[2].status, "parked");
        assert!(created.iter().all(|alarm| alarm.time >= start));
    }

    // Test Settings: every create call fails.
    // Scenario: The batch produces nothing at all.
    // Expected Outcome: The write ends as an error carrying the attempt
    // count, with no payload accepted.
    #[traced_test]
    #[tokio::test]
    async fn tc18() {
        let api = ScriptedCreateApi::failing_at(&[0, 1]);
        let table = input_table(
            &["Event Type", "Source ID"],
            &[&["c8y_DoorOpen", PUMP], &["c8y_DoorClosed", VALVE]],
        );

        let err = EventWriter::new(&api)
            .write(&table, &FetchContext::detached())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WriteError::AllFailed {
                entity: "events",
                attempted: 2,
                ..
            }
        ));
        assert!(api.created_events().is_empty());
    }

    // Test Settings: one row fully specified, one row without subtype and
    // series.
    // Scenario: Measurement rows become nested fragment payloads.
    // Expected Outcome: The payload nests subtype, series, value and unit;
    // absent subtype and series fall back to "unknown".
    #[traced_test]
    #[tokio::test]
    async fn tc19() {
        let api = ScriptedCreateApi::new();
        let table = input_table(
            &[
                "Measurement Type",
                "Source ID",
                "Measurement Subtype",
                "Fragment Series",
                "Value",
                "Unit",
            ],
            &[
                &["c8y_SteamMeasurement", PUMP, "c8y_Steam", "Temperature", "98.6", "C"],
                &["c8y_SteamMeasurement", PUMP, "", "", "1.5", "bar"],
            ],
        );

        let report = MeasurementWriter::new(&api)
            .write(&table, &FetchContext::detached())
            .await
            .unwrap();
        assert_eq!(report.created, 2);

        let created = api.created_measurements();
        assert_eq!(created[0].kind, "c8y_SteamMeasurement");
        assert_eq!(created[0].source.id.as_deref(), Some(PUMP));
        assert_eq!(
            serde_json::Value::Object(created[0].fragments.clone()),
            json!({ "c8y_Steam": { "Temperature": { "value": 98.6, "unit": "C" } } })
        );
        assert_eq!(
            serde_json::Value::Object(created[1].fragments.clone()),
            json!({ "unknown": { "unknown": { "value": 1.5, "unit": "bar" } } })
        );
    }

    // Test Settings: input table without the Source ID column.
    // Scenario: A required column is missing from the input.
    // Expected Outcome: The write is rejected up front; no create call is
    // ever made.
    #[traced_test]
    #[tokio::test]
    async fn tc20() {
        let api = ScriptedCreateApi::new();
        let table = input_table(
            &["Event Type", "Description"],
            &[&["c8y_DoorOpen", "no source id"]],
        );

        let err = EventWriter::new(&api)
            .write(&table, &FetchContext::detached())
            .await
            .unwrap_err();

        assert!(matches!(err, WriteError::MissingColumn("Source ID")));
        assert!(api.created_events().is_empty());
    }
}
