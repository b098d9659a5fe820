use std::fs;
use std::path::Path;
use srl_record::dataset::{parse_attribute_line, ArgumentBuilder, ExtractArgs, IDataset};
use srl_record::{AttributeDomain, Error};

fn instance_line(i: usize, role: &str) -> String {
    format!(
        r#"{{"id":"wsj_{i:04}","predicate":{{"simple":{{"wordnum":1,"height":0}}}},"roleset":"say.01","voice":"a","arguments":[{{"pointer":{{"simple":{{"wordnum":0,"height":1}}}},"role":"{role}"}}],"tree":{{"label":"S","children":[{{"label":"NP-SBJ","children":[{{"label":"NNP","token":"Name{i}"}}]}},{{"label":"VP","children":[{{"label":"VBD","token":"said"}}]}}]}}}}"#,
        i = i,
        role = role
    )
}

fn write_corpus(dir: &Path, lines: &[String]) -> String {
    let path = dir.join("instances.jsonl");
    fs::write(&path, lines.join("\n")).unwrap();
    path.to_str().unwrap().to_string()
}

fn data_rows(path: &Path) -> Vec<String> {
    let text = fs::read_to_string(path).unwrap();
    let (_, data) = text.split_once("@data\n").unwrap();
    data.lines().map(str::to_string).collect()
}

#[test]
fn writes_full_file_bit_exact() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_corpus(
        dir.path(),
        &[instance_line(0, "ARG0"), instance_line(1, "ARGM-TMP")],
    );
    let args = ExtractArgs::new(&input);
    let mut builder = ArgumentBuilder::new(&args);
    let summary = builder.build().unwrap();
    assert_eq!(summary.records, 2);
    assert!(summary.failures.is_empty());
    assert!(summary.report.is_complete());

    let full = fs::read_to_string(builder.full_file()).unwrap();
    let expected = "@relation SemanticArgumentClassification\n\n\
                    @attribute predicate {say}\n\
                    @attribute path {NP^VP}\n\
                    @attribute phraseType {NP}\n\
                    @attribute position {before}\n\
                    @attribute voice {active}\n\
                    @attribute class {ARG0,ARGM}\n\n\
                    @data\n\
                    say,NP^VP,NP,before,active,ARG0\n\
                    say,NP^VP,NP,before,active,ARGM\n";
    assert_eq!(full, expected);
}

#[test]
fn partitions_are_consecutive_and_self_contained() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<_> = (0..11)
        .map(|i| instance_line(i, &format!("ARG{}", i)))
        .collect();
    let input = write_corpus(dir.path(), &lines);
    let args = ExtractArgs::new(&input);
    let mut builder = ArgumentBuilder::new(&args);
    let summary = builder.build().unwrap();
    assert_eq!(summary.records, 11);

    let files = builder.partition_files();
    let rows: Vec<_> = files.iter().map(|f| data_rows(f)).collect();
    assert_eq!(rows.iter().map(Vec::len).collect::<Vec<_>>(), vec![6, 2, 2]);
    assert!(rows[0][0].ends_with(",ARG0"));
    assert!(rows[1][0].ends_with(",ARG6"));
    assert!(rows[2][1].ends_with(",ARG9"));
    // the eleventh record is in no partition
    assert!(rows.iter().flatten().all(|row| !row.ends_with(",ARG10")));
    assert_eq!(data_rows(&builder.full_file()).len(), 11);

    for file in &files {
        let text = fs::read_to_string(file).unwrap();
        let class_line = text
            .lines()
            .find(|line| line.starts_with("@attribute class "))
            .unwrap();
        let (_, domain) = parse_attribute_line(class_line).unwrap();
        match domain {
            AttributeDomain::Nominal(values) => assert_eq!(values.len(), 11),
            other => panic!("class should be nominal, got {:?}", other),
        }
    }
}

#[test]
fn malformed_instance_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines: Vec<_> = (0..100).map(|i| instance_line(i, "ARG1")).collect();
    lines[57] = lines[57].replace(r#""wordnum":0,"height":1"#, r#""wordnum":7,"height":1"#);
    let input = write_corpus(dir.path(), &lines);
    let mut args = ExtractArgs::new(&input);
    args.parallel = true;
    let summary = ArgumentBuilder::new(&args).build().unwrap();
    assert_eq!(summary.records, 99);
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(
        &summary.failures[0],
        Error::Extraction { instance, .. } if instance == "wsj_0057"
    ));
}

#[test]
fn configuration_error_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_corpus(dir.path(), &[instance_line(0, "ARG0")]);
    let mut args = ExtractArgs::new(&input);
    args.ratios = "0.9,0.2,0.2".to_string();
    let mut builder = ArgumentBuilder::new(&args);
    assert!(matches!(builder.build(), Err(Error::Configuration(_))));
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn ipc_and_domain_dumps_are_optional_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_corpus(
        dir.path(),
        &[instance_line(0, "ARG0"), instance_line(1, "ARG1")],
    );
    let mut args = ExtractArgs::new(&input);
    args.with_ipc = true;
    args.save_domains = true;
    args.instance_ratio = 0.5;
    let summary = ArgumentBuilder::new(&args).build().unwrap();
    assert_eq!(summary.records, 1);
    assert!(summary.report.is_complete());
    assert!(dir
        .path()
        .join("SemanticArgumentClassification_data_train.records.ipc")
        .exists());
    let domains = fs::read_to_string(dir.path().join("domains.txt")).unwrap();
    assert!(domains.contains("class\t0\tARG0\n"));
    assert!(!domains.contains("ARG1"));
}

#[test]
fn undecodable_corpus_line_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let lines = vec![
        instance_line(0, "ARG0"),
        "{broken".to_string(),
        instance_line(2, "ARG1"),
    ];
    let input = write_corpus(dir.path(), &lines);
    let args = ExtractArgs::new(&input);
    let mut builder = ArgumentBuilder::new(&args);
    let summary = builder.build().unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(summary.failures.len(), 1);
    assert!(matches!(&summary.failures[0], Error::Corpus { line: 2, .. }));
    assert_eq!(data_rows(&builder.full_file()).len(), 2);
}
