use bammart::config::IdSource;
use bammart::io::alignment::{extract_identifiers, read_identifiers};
use noodles::bam;
use noodles::core::Position;
use noodles::sam;
use noodles::sam::alignment::io::Write as _;
use noodles::sam::alignment::record::cigar::{op::Kind, Op};
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record_buf::{Cigar, QualityScores, Sequence};
use noodles::sam::alignment::RecordBuf;
use noodles::sam::header::record::value::{map::ReferenceSequence, Map};
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::Path;
use tempfile::TempDir;

const TRANSCRIPTS: [&str; 3] = ["ENST00000456328", "ENST00000450305", "ENST00000488147"];

fn mapped(reference_sequence_id: usize) -> RecordBuf {
    RecordBuf::builder()
        .set_flags(Flags::empty())
        .set_reference_sequence_id(reference_sequence_id)
        .set_alignment_start(Position::try_from(1).unwrap())
        .set_cigar([Op::new(Kind::Match, 4)].into_iter().collect::<Cigar>())
        .set_sequence(Sequence::from(b"ACGT".to_vec()))
        .set_quality_scores(QualityScores::from(vec![40; 4]))
        .build()
}

/// Four mapped reads over three transcripts plus one unmapped read
fn write_fixture(path: &Path) {
    let mut builder = sam::Header::builder();
    for name in TRANSCRIPTS {
        builder = builder.add_reference_sequence(
            name,
            Map::<ReferenceSequence>::new(NonZeroUsize::try_from(1000).unwrap()),
        );
    }
    let header = builder.build();

    let mut writer = bam::io::Writer::new(File::create(path).unwrap());
    writer.write_header(&header).unwrap();
    for id in [0, 1, 2, 1] {
        writer.write_alignment_record(&header, &mapped(id)).unwrap();
    }
    writer
        .write_alignment_record(&header, &RecordBuf::default())
        .unwrap();
}

#[test]
fn test_bam_fixture_yields_expected_transcripts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sample.bam");
    write_fixture(&path);

    let ids = read_identifiers(&path, IdSource::Reference).unwrap();
    let mut expected: Vec<&str> = TRANSCRIPTS.to_vec();
    expected.sort();
    assert_eq!(ids.iter().map(String::as_str).collect::<Vec<_>>(), expected);
}

#[test]
fn test_bam_files_deduplicate_across_directory() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir.path().join("a.bam"));
    std::fs::create_dir(dir.path().join("run2")).unwrap();
    write_fixture(&dir.path().join("run2").join("b.bam"));

    let scan = extract_identifiers(dir.path(), IdSource::Reference).unwrap();
    assert_eq!(scan.files.len(), 2);
    assert_eq!(scan.ids.len(), 3);
}

#[test]
fn test_gene_tag_mode_ignores_untagged_reads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("untagged.bam");
    write_fixture(&path);

    let ids = read_identifiers(&path, IdSource::GeneTag).unwrap();
    assert!(ids.is_empty());
}
