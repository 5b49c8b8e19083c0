//! End-to-end pipeline tests against an in-memory DuckDB warehouse

use pl_core::{Config, FailurePolicy};
use pl_db::{DuckDbWarehouse, TableCounts};
use pl_load::{run_pipeline, Dataset, LoadError, LoadEvent};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SETANTA: &str = r#"{"num_songs": 1, "artist_id": "AR5KOSW1187FB35FF4", "artist_latitude": 49.80388, "artist_longitude": 15.47491, "artist_location": "Dubai UAE", "artist_name": "Elena", "song_id": "SOZCTXZ12AB0182364", "title": "Setanta matins", "duration": 269.58312, "year": 0}"#;

const CASUAL: &str = r#"{"num_songs": 1, "artist_id": "ARD7TVE1187B99BFB1", "artist_latitude": null, "artist_longitude": null, "artist_location": "California - LA", "artist_name": "Casual", "song_id": "SOMZWCG12A8C13C480", "title": "I Didn't Mean To", "duration": 218.93179, "year": 0}"#;

const EVENTS: &str = concat!(
    r#"{"artist":null,"auth":"Logged In","firstName":"Walter","gender":"M","itemInSession":0,"lastName":"Frye","length":null,"level":"free","location":"San Francisco-Oakland-Hayward, CA","method":"GET","page":"Home","registration":1540919166796.0,"sessionId":38,"song":null,"status":200,"ts":1541105830796,"userAgent":"Mozilla/5.0","userId":"39"}"#,
    "\n",
    r#"{"artist":"Elena","auth":"Logged In","firstName":"Lily","gender":"F","itemInSession":0,"lastName":"Koch","length":269.58312,"level":"free","location":"Chicago-Naperville-Elgin, IL-IN-WI","method":"PUT","page":"NextSong","registration":1541048010796.0,"sessionId":818,"song":"Setanta matins","status":200,"ts":1541032226796,"userAgent":"Mozilla/5.0","userId":"15"}"#,
    "\n",
    r#"{"artist":"Des'ree","auth":"Logged In","firstName":"Kaylee","gender":"F","itemInSession":1,"lastName":"Summers","length":246.30812,"level":"free","location":"Phoenix-Mesa-Scottsdale, AZ","method":"PUT","page":"NextSong","registration":1540344794796.0,"sessionId":139,"song":"You Gotta Be","status":200,"ts":1541106106796,"userAgent":"Mozilla/5.0","userId":"8"}"#,
    "\n",
    r#"{"artist":null,"auth":"Logged In","firstName":"Kaylee","gender":"F","itemInSession":2,"lastName":"Summers","length":null,"level":"free","location":"Phoenix-Mesa-Scottsdale, AZ","method":"GET","page":"Logout","registration":1540344794796.0,"sessionId":139,"song":null,"status":307,"ts":1541106352796,"userAgent":"Mozilla/5.0","userId":"8"}"#,
    "\n",
);

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Project with two catalog files and one event log.
fn sample_project(on_error: &str) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join("playlog.yml"),
        &format!("name: sparkify\non_error: {on_error}\ndatabase:\n  path: \":memory:\"\n"),
    );
    write(
        &dir.path().join("data/song_data/A/B/C/TRABCEI128F424C983.json"),
        SETANTA,
    );
    write(
        &dir.path().join("data/song_data/A/A/A/TRAAAAW128F429D538.json"),
        CASUAL,
    );
    write(
        &dir.path().join("data/log_data/2018/11/2018-11-01-events.json"),
        EVENTS,
    );
    let config = Config::load_from_dir(dir.path()).unwrap();
    (dir, config)
}

fn dimension_snapshot(wh: &DuckDbWarehouse) -> Vec<String> {
    let mut out = Vec::new();
    for query in [
        "SELECT song_id || '|' || title || '|' || artist_id FROM songs ORDER BY song_id",
        "SELECT artist_id || '|' || name FROM artists ORDER BY artist_id",
        "SELECT user_id || '|' || level FROM users ORDER BY user_id",
        "SELECT CAST(epoch_ms(start_time) AS VARCHAR) FROM \"time\" ORDER BY start_time",
    ] {
        let mut stmt = wh.conn().prepare(query).unwrap();
        let rows = stmt.query_map([], |row| row.get::<_, String>(0)).unwrap();
        out.extend(rows.map(|r| r.unwrap()));
    }
    out
}

#[test]
fn test_full_pipeline_resolves_known_songs() {
    let (dir, config) = sample_project("abort");
    let wh = DuckDbWarehouse::open_memory().unwrap();

    let summary = run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap();

    let songs = summary.songs.as_ref().unwrap();
    let logs = summary.logs.as_ref().unwrap();
    assert_eq!(songs.found, 2);
    assert_eq!(logs.found, 1);
    assert_eq!(logs.rows.songplays, 2);
    assert_eq!(logs.rows.resolved_songplays, 1);
    assert_eq!(summary.files_loaded(), 3);
    assert_eq!(summary.files_skipped(), 0);

    assert_eq!(
        wh.table_counts().unwrap(),
        TableCounts {
            songplays: 2,
            users: 2,
            songs: 2,
            artists: 2,
            time: 2,
        }
    );

    let (song_id, artist_id, session_id, level): (Option<String>, Option<String>, i64, String) = wh
        .conn()
        .query_row(
            "SELECT song_id, artist_id, session_id, level FROM songplays WHERE user_id = '15'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();
    assert_eq!(song_id.as_deref(), Some("SOZCTXZ12AB0182364"));
    assert_eq!(artist_id.as_deref(), Some("AR5KOSW1187FB35FF4"));
    assert_eq!(session_id, 818);
    assert_eq!(level, "free");
}

#[test]
fn test_unmatched_event_keeps_other_fields() {
    let (dir, config) = sample_project("abort");
    let wh = DuckDbWarehouse::open_memory().unwrap();
    run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap();

    let row: (Option<String>, Option<String>, String, i64, String, String) = wh
        .conn()
        .query_row(
            "SELECT song_id, artist_id, user_id, session_id, location, user_agent \
             FROM songplays WHERE user_id = '8'",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            },
        )
        .unwrap();
    assert_eq!(row.0, None);
    assert_eq!(row.1, None);
    assert_eq!(row.2, "8");
    assert_eq!(row.3, 139);
    assert_eq!(row.4, "Phoenix-Mesa-Scottsdale, AZ");
    assert_eq!(row.5, "Mozilla/5.0");
}

#[test]
fn test_non_play_events_are_excluded() {
    let (dir, config) = sample_project("abort");
    let wh = DuckDbWarehouse::open_memory().unwrap();
    run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap();

    // Walter only has a Home event
    let walter: i64 = wh
        .conn()
        .query_row("SELECT COUNT(*) FROM users WHERE user_id = '39'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(walter, 0);
}

#[test]
fn test_rerun_doubles_songplays_only() {
    let (dir, config) = sample_project("abort");
    let wh = DuckDbWarehouse::open_memory().unwrap();

    run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap();
    let first = dimension_snapshot(&wh);
    run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap();

    assert_eq!(dimension_snapshot(&wh), first);
    assert_eq!(wh.table_row_count("songplays").unwrap(), 4);
    let ids: Vec<i64> = {
        let mut stmt = wh
            .conn()
            .prepare("SELECT songplay_id FROM songplays ORDER BY songplay_id")
            .unwrap();
        let rows = stmt.query_map([], |row| row.get(0)).unwrap();
        rows.map(|r| r.unwrap()).collect()
    };
    let mut distinct = ids.clone();
    distinct.dedup();
    assert_eq!(distinct.len(), 4);
}

#[test]
fn test_songs_phase_runs_first_regardless_of_order() {
    let (dir, config) = sample_project("abort");
    let wh = DuckDbWarehouse::open_memory().unwrap();
    let mut phases = Vec::new();

    let summary = run_pipeline(
        &wh,
        &config,
        dir.path(),
        &[Dataset::Logs, Dataset::Songs],
        &mut |event| {
            if let LoadEvent::Discovered { dataset, .. } = event {
                phases.push(*dataset);
            }
        },
    )
    .unwrap();

    assert_eq!(phases, vec!["songs", "logs"]);
    assert_eq!(summary.logs.unwrap().rows.resolved_songplays, 1);
}

#[test]
fn test_logs_only_leaves_catalog_empty() {
    let (dir, config) = sample_project("abort");
    let wh = DuckDbWarehouse::open_memory().unwrap();

    let summary = run_pipeline(&wh, &config, dir.path(), &[Dataset::Logs], &mut |_| {}).unwrap();

    assert!(summary.songs.is_none());
    assert_eq!(summary.logs.as_ref().unwrap().rows.resolved_songplays, 0);
    assert_eq!(wh.table_row_count("songs").unwrap(), 0);
    assert_eq!(wh.table_row_count("songplays").unwrap(), 2);
}

#[test]
fn test_empty_roots_report_zero_of_zero() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("playlog.yml"), "name: empty\n");
    fs::create_dir_all(dir.path().join("data/song_data")).unwrap();
    fs::create_dir_all(dir.path().join("data/log_data")).unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    let wh = DuckDbWarehouse::open_memory().unwrap();
    let mut totals = Vec::new();

    let summary = run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |event| {
        if let LoadEvent::Discovered { total, .. } = event {
            totals.push(*total);
        }
    })
    .unwrap();

    assert_eq!(totals, vec![0, 0]);
    assert_eq!(summary.files_loaded(), 0);
    assert_eq!(wh.table_counts().unwrap(), TableCounts::default());
}

#[test]
fn test_broken_log_aborts_after_catalog() {
    let (dir, config) = sample_project("abort");
    write(
        &dir.path().join("data/log_data/2018/11/2018-11-02-events.json"),
        "{not json\n",
    );
    let wh = DuckDbWarehouse::open_memory().unwrap();

    let err = run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap_err();

    assert!(matches!(err, LoadError::Extract { .. }));
    assert!(err.path().unwrap().ends_with("2018-11-02-events.json"));
    // The first log file was committed before the failure
    assert_eq!(wh.table_row_count("songs").unwrap(), 2);
    assert_eq!(wh.table_row_count("songplays").unwrap(), 2);
}

#[test]
fn test_broken_log_skipped_with_skip_policy() {
    let (dir, config) = sample_project("skip");
    assert_eq!(config.on_error, FailurePolicy::Skip);
    write(
        &dir.path().join("data/log_data/2018/11/2018-11-02-events.json"),
        "{not json\n",
    );
    let wh = DuckDbWarehouse::open_memory().unwrap();

    let summary = run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap();

    assert_eq!(summary.files_skipped(), 1);
    assert_eq!(summary.files_loaded(), 3);
    assert_eq!(wh.table_row_count("songplays").unwrap(), 2);
}

#[test]
fn test_missing_log_root_is_discovery_error() {
    let (dir, config) = sample_project("abort");
    fs::remove_dir_all(dir.path().join("data/log_data")).unwrap();
    let wh = DuckDbWarehouse::open_memory().unwrap();

    let err = run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap_err();
    assert!(matches!(err, LoadError::Discovery { dataset: "logs", .. }));
    assert_eq!(wh.table_row_count("songs").unwrap(), 2);
}

#[test]
fn test_duplicate_ts_and_level_change_in_one_file() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("playlog.yml"), "name: upgrade\n");
    fs::create_dir_all(dir.path().join("data/song_data")).unwrap();
    let free = r#"{"artist":"Elena","firstName":"Lily","gender":"F","lastName":"Koch","length":269.58312,"level":"free","location":"Chicago-Naperville-Elgin, IL-IN-WI","page":"NextSong","sessionId":818,"song":"Setanta matins","ts":1541032226796,"userAgent":"Mozilla/5.0","userId":"15"}"#;
    let paid = free.replace(r#""level":"free""#, r#""level":"paid""#);
    write(
        &dir.path().join("data/log_data/2018/11/2018-11-01-events.json"),
        &format!("{free}\n{paid}\n"),
    );
    let config = Config::load_from_dir(dir.path()).unwrap();
    let wh = DuckDbWarehouse::open_memory().unwrap();

    let summary = run_pipeline(&wh, &config, dir.path(), &Dataset::ALL, &mut |_| {}).unwrap();
    assert_eq!(summary.files_loaded(), 1);

    assert_eq!(wh.table_row_count("time").unwrap(), 1);
    assert_eq!(wh.table_row_count("users").unwrap(), 1);
    assert_eq!(wh.table_row_count("songplays").unwrap(), 2);
    let level: String = wh
        .conn()
        .query_row("SELECT level FROM users WHERE user_id = '15'", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(level, "paid");
}
