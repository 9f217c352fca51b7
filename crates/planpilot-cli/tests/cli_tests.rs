use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create an offline Command with --no-color bound to a
/// database inside `temp_dir`
fn planpilot_cmd(temp_dir: &TempDir) -> Command {
    let db_path = temp_dir.path().join("cli_test.db");
    let mut cmd = Command::cargo_bin("planpilot").expect("Failed to find planpilot binary");
    cmd.arg("--no-color")
        .arg("--offline")
        .arg("--database-file")
        .arg(db_path);
    cmd
}

/// Fills steps 1 to 3 through the CLI.
fn prepare_context(temp_dir: &TempDir, mode: &str) {
    planpilot_cmd(temp_dir)
        .args([
            "context",
            "--mode",
            mode,
            "--subject",
            "Natur und Technik",
            "--topic",
            "Einfache Stromkreise",
            "--level",
            "sek1",
            "--goal-type",
            "application",
            "--lessons",
            "4",
        ])
        .assert()
        .success();
    planpilot_cmd(temp_dir)
        .args(["goal", "add", "Die SuS können einen Stromkreis aufbauen."])
        .assert()
        .success();
    planpilot_cmd(temp_dir)
        .args(["didactics", "--structure", "aviva"])
        .assert()
        .success();
}

#[test]
fn test_cli_status_on_fresh_database() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Schritt 1 von 9: Kontext"))
        .stdout(predicate::str::contains("- **KI**: offline"))
        .stdout(predicate::str::contains("noch nicht gespeichert"));
}

#[test]
fn test_cli_next_lists_missing_fields() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("- Bitte wähle eine Stufe."))
        .stdout(predicate::str::contains("- Bitte gib ein Fach/Thema ein."))
        .stdout(predicate::str::contains(
            "Error: Schritt 1 ist noch nicht vollständig.",
        ));
}

#[test]
fn test_cli_context_update_and_undo() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .args(["context", "--subject", "Geschichte", "--duration", "90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Fach: Geschichte"))
        .stdout(predicate::str::contains("- Dauer: 90 Min"));

    planpilot_cmd(&temp_dir)
        .arg("undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Änderung rückgängig gemacht."));

    planpilot_cmd(&temp_dir)
        .arg("context")
        .assert()
        .success()
        .stdout(predicate::str::contains("Geschichte").not());

    planpilot_cmd(&temp_dir)
        .arg("redo")
        .assert()
        .success();
    planpilot_cmd(&temp_dir)
        .arg("context")
        .assert()
        .success()
        .stdout(predicate::str::contains("- **Fach**: Geschichte"));
}

#[test]
fn test_cli_rejects_unknown_option_values() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .args(["context", "--level", "uni"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid level: uni"));
}

#[test]
fn test_cli_locked_step_and_gate() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .args(["goto", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Schritt 8 ist noch gesperrt."));

    planpilot_cmd(&temp_dir)
        .args(["approve", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Bitte generiere zuerst eine Kurzversion.",
        ));
}

#[test]
fn test_cli_last_goal_cannot_be_removed() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .args(["goal", "add", "Erstes Ziel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Erstes Ziel"));

    planpilot_cmd(&temp_dir)
        .args(["goal", "remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Error: Das letzte Lernziel kann nicht entfernt werden.",
        ));

    planpilot_cmd(&temp_dir)
        .args(["goal", "set", "0", "Null"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Positionen beginnen bei 1."));
}

#[test]
fn test_cli_curriculum_search_and_mapping() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "search", "stromkreis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NT.5.1"));

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "search", "xyzzy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keine Kompetenzen gefunden."));

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "add", "NT.5.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: NT.5.1 zugeordnet."));

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "add", "NT.5.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bereits zugeordnet"));

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "confirm", "nt.5.1"])
        .assert()
        .success();

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("☑ **NT.5.1**"));
}

#[test]
fn test_cli_curriculum_upload() {
    let temp_dir = create_cli_test_environment();
    let txt = temp_dir.path().join("lehrplan.txt");
    std::fs::write(&txt, "MA.9.1: Terme umformen\nEigene Kompetenz\n").unwrap();
    let pdf = temp_dir.path().join("lehrplan.pdf");
    std::fs::write(&pdf, "%PDF").unwrap();

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "upload", txt.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2 Kompetenzen gelesen, 2 neu zugeordnet.",
        ))
        .stdout(predicate::str::contains("MA.9.1"));

    planpilot_cmd(&temp_dir)
        .args(["curriculum", "upload", pdf.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wird noch nicht unterstützt"));
}

#[test]
fn test_cli_export_requires_detail_plan() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .args(["export", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to export plan"));
}

#[test]
#[allow(clippy::too_many_lines)]
fn test_cli_single_lesson_workflow() {
    let temp_dir = create_cli_test_environment();
    prepare_context(&temp_dir, "single");

    for _ in 0..3 {
        planpilot_cmd(&temp_dir).arg("next").assert().success();
    }
    planpilot_cmd(&temp_dir)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Notice:"))
        .stdout(predicate::str::contains("Keine KI verbunden (Offline-Modus)."))
        .stdout(predicate::str::contains("### Phasen (45 Min)"));

    planpilot_cmd(&temp_dir)
        .args(["edit", "--title", "Stromkreise verstehen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Stromkreise verstehen"));

    planpilot_cmd(&temp_dir)
        .args(["approve", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Gate A bestätigt."));
    planpilot_cmd(&temp_dir)
        .arg("revise")
        .assert()
        .success()
        .stdout(predicate::str::contains("ohne KI-Überarbeitung"))
        .stdout(predicate::str::contains("## Stromkreise verstehen"));
    planpilot_cmd(&temp_dir)
        .args(["approve", "b"])
        .assert()
        .success();

    planpilot_cmd(&temp_dir)
        .arg("detail")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fallback-Logik"))
        .stdout(predicate::str::contains("## Unterrichtsverlauf (45 Min)"));

    planpilot_cmd(&temp_dir)
        .args(["refine", "mehr Gruppenarbeit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Detailplanung angepasst."));

    planpilot_cmd(&temp_dir)
        .args(["goto", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Schritt 9: Export"));

    let export_dir = temp_dir.path().join("out");
    std::fs::create_dir(&export_dir).unwrap();
    planpilot_cmd(&temp_dir)
        .args(["export", "--format", "latex", "--output"])
        .arg(&export_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exportiert als latex nach"));

    let exported: Vec<_> = std::fs::read_dir(&export_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].extension().unwrap(), "tex");
    let latex = std::fs::read_to_string(&exported[0]).unwrap();
    assert!(latex.contains("\\section*{Lernziele}"));

    planpilot_cmd(&temp_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("- **Status**: Exportiert"));
}

#[test]
fn test_cli_sequence_detail_for_all_lessons() {
    let temp_dir = create_cli_test_environment();
    prepare_context(&temp_dir, "sequence");

    planpilot_cmd(&temp_dir)
        .arg("generate")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Sequenz (4 Lektionen)"));

    planpilot_cmd(&temp_dir)
        .args(["detail", "--all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step 8 is not accessible yet"));

    planpilot_cmd(&temp_dir).args(["approve", "a"]).assert().success();
    planpilot_cmd(&temp_dir).args(["approve", "b"]).assert().success();

    planpilot_cmd(&temp_dir)
        .args(["detail", "--lesson", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lektion 2 wurde mit der Vorlage geplant."));

    planpilot_cmd(&temp_dir)
        .args(["detail", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Lektion 1:"))
        .stdout(predicate::str::contains("- Lektion 4:"))
        .stdout(predicate::str::contains("- Lektion 2:").not());

    planpilot_cmd(&temp_dir)
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Sequenzübersicht"));
}

#[test]
fn test_cli_check_reports_incompatible_slots() {
    let temp_dir = create_cli_test_environment();

    planpilot_cmd(&temp_dir)
        .args([
            "didactics",
            "--structure",
            "direct_instruction",
            "--learning-mode",
            "inquiry",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("● `direct_instruction`"))
        .stdout(predicate::str::contains("Steuerungsgrad"));

    planpilot_cmd(&temp_dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("### Didaktische Kombination"));
}

#[test]
fn test_cli_status_json_and_reset() {
    let temp_dir = create_cli_test_environment();
    prepare_context(&temp_dir, "single");

    let output = planpilot_cmd(&temp_dir)
        .args(["status", "--json"])
        .output()
        .expect("Failed to run status");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["plan"]["subject"], "Natur und Technik");
    assert_eq!(json["step"], 1);

    planpilot_cmd(&temp_dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("--confirm"));

    planpilot_cmd(&temp_dir)
        .args(["reset", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Neue Planung begonnen."));

    planpilot_cmd(&temp_dir)
        .arg("context")
        .assert()
        .success()
        .stdout(predicate::str::contains("Natur und Technik").not());
}
