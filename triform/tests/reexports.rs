use triform::core::models::{ChromSizes, ReadInterval, ReadSet, Strand};
use triform::peaks::{PeakCaller, PeakCallerConfig};

#[test]
fn test_umbrella_reexports() {
    let sizes: ChromSizes = [("chr1", 400)].into_iter().collect();
    let treatment = ReadSet::from(vec![ReadInterval::new("chr1", 0, 36, Strand::Forward)]);
    let control = ReadSet::from(vec![
        ReadInterval::new("chr1", 0, 36, Strand::Forward),
        ReadInterval::new("chr1", 100, 136, Strand::Reverse),
        ReadInterval::new("chr1", 110, 146, Strand::Reverse),
    ]);

    let config = PeakCallerConfig {
        bin_width: 100,
        flank_distance: 100,
        ..Default::default()
    };
    let result = PeakCaller::triform(config)
        .call_peaks(&treatment, &control, &sizes)
        .unwrap();
    assert!(result.peaks.is_empty());
    assert_eq!(result.summaries.len(), 1);
}
