use std::collections::BTreeSet;

use proptest::prelude::*;
use qabits::{
    BitFieldCodec, ConfigurationError, Enumeration, LayoutSpec, Preset,
    raster::{Band, apply_per_element},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn state_1km() -> BitFieldCodec {
    let spec = LayoutSpec::new()
        .field("0-1", [(0, "clear"), (1, "cloud"), (2, "mix")])
        .field("2-2", [(1, "shadow")])
        .field("8-9", [(1, "small_cirrus"), (2, "average_cirrus"), (3, "high_cirrus")]);
    BitFieldCodec::new(spec, Some(16)).unwrap()
}

fn domain(codec: &BitFieldCodec) -> BTreeSet<u64> {
    (0..codec.max_value()).collect()
}

#[test]
fn round_trip_every_category() {
    init_logging();
    for preset in Preset::ALL {
        let codec = preset.codec().unwrap();
        let names: Vec<String> = codec.categories().map(str::to_string).collect();
        for name in &names {
            let word = codec.encode(name).unwrap();
            assert!(
                codec.decode(word).unwrap().contains(&name.as_str()),
                "{preset}: {name} encoded as {word}"
            );
        }
    }
}

#[test]
fn encoding_leaves_other_fields_zero() {
    let spec = LayoutSpec::new()
        .field("0-1", [(1, "a1"), (2, "a2"), (3, "a3")])
        .field("2-2", [(1, "b")]);
    let codec = BitFieldCodec::new(spec, None).unwrap();

    for name in ["a1", "a2", "a3"] {
        assert_eq!(codec.encode(name).unwrap() >> 2, 0);
    }
    assert_eq!(codec.encode("b").unwrap() & 0b11, 0);
}

#[test]
fn full_width_field_partitions_domain() {
    let spec = LayoutSpec::new().field(
        "0-2",
        (0..8u64).map(|value| (value, format!("class_{value}"))),
    );
    let codec = BitFieldCodec::new(spec, None).unwrap();

    let mut seen = BTreeSet::new();
    for value in 0..8u64 {
        let matching = codec.matching_values(&format!("class_{value}")).unwrap();
        assert_eq!(matching, BTreeSet::from([value]));
        for word in matching {
            assert!(seen.insert(word), "word {word} claimed twice");
        }
    }
    assert_eq!(seen, domain(&codec));
}

#[test]
fn and_or_not_algebra() {
    let codec = state_1km();
    let all = codec.matching_values_all(&["cloud", "shadow"]).unwrap();
    let any = codec.matching_values_any(&["cloud", "shadow"]).unwrap();
    assert!(all.is_subset(&any));

    let cloud = codec.matching_values("cloud").unwrap();
    let not_cloud = codec.non_matching_values(&["cloud"]).unwrap();
    assert!(cloud.is_disjoint(&not_cloud));
    assert_eq!(
        cloud.union(&not_cloud).copied().collect::<BTreeSet<_>>(),
        domain(&codec)
    );
}

#[test]
fn overlapping_ranges_are_rejected() {
    let spec = LayoutSpec::new()
        .field("0-1", [(1, "a")])
        .field("1-2", [(1, "b")]);
    assert!(matches!(
        BitFieldCodec::new(spec, None),
        Err(ConfigurationError::OverlappingBits { bit: 1 })
    ));
}

#[test]
fn duplicate_categories_are_rejected() {
    let spec = LayoutSpec::new()
        .field("0-1", [(1, "cloud")])
        .field("4", [(1, "cloud")]);
    assert!(matches!(
        BitFieldCodec::new(spec, None),
        Err(ConfigurationError::DuplicateCategory(name)) if name == "cloud"
    ));
}

#[test]
fn state_1km_sample_word() {
    let codec = state_1km();
    let decoded: BTreeSet<&str> = codec.decode(204).unwrap().into_iter().collect();
    assert_eq!(decoded, BTreeSet::from(["shadow", "clear"]));
    assert_eq!(codec.decode(204).unwrap(), vec!["clear", "shadow"]);
    assert!(!codec.matches(204, "cloud").unwrap());
}

#[test]
fn unmapped_bits_decode_to_nothing() {
    let spec = LayoutSpec::new()
        .field("0", [(1, "water")])
        .field("1-2", [(1, "thin"), (2, "thick")]);
    let codec = BitFieldCodec::new(spec, Some(8)).unwrap();
    assert!(codec.decode(0).unwrap().is_empty());
    assert!(codec.decode(0b1111_0000).unwrap().is_empty());
}

#[test]
fn decoded_bands_follow_decode() {
    let codec = Preset::Modis09gaState1km.codec().unwrap();
    let band = Band::new(
        Preset::Modis09gaState1km.band(),
        vec![0, 204, 0x8001, 0x2302, 65535],
    );
    let decoded = apply_per_element(&codec, &band).unwrap();

    for (i, value) in band.values.iter().enumerate() {
        let categories = codec.decode(*value).unwrap();
        for (name, mask) in &decoded.masks {
            assert_eq!(mask[i], categories.contains(&name.as_str()), "{name} at {i}");
        }
    }
}

fn two_field_codec(total_bits: u32) -> BitFieldCodec {
    let spec = LayoutSpec::new()
        .field("1-2", [(0, "low"), (3, "high")])
        .field("5", [(1, "flag")]);
    BitFieldCodec::new(spec, Some(total_bits)).unwrap()
}

proptest! {
    #[test]
    fn scan_and_analytic_agree(total_bits in 6u32..14, category in prop::sample::select(vec!["low", "high", "flag"])) {
        let codec = two_field_codec(total_bits);
        prop_assert_eq!(
            codec.matching_values_with(category, Enumeration::Scan).unwrap(),
            codec.matching_values_with(category, Enumeration::Analytic).unwrap()
        );
    }

    #[test]
    fn matching_values_agree_with_decode(word in 0u64..1024) {
        let codec = two_field_codec(10);
        let decoded = codec.decode(word).unwrap();
        for category in ["low", "high", "flag"] {
            let matching = codec.matching_values(category).unwrap();
            prop_assert_eq!(matching.contains(&word), decoded.contains(&category));
            prop_assert_eq!(codec.matches(word, category).unwrap(), decoded.contains(&category));
        }
        prop_assert!(!codec.matches(word, "fog").unwrap());
    }

    #[test]
    fn out_of_range_words_are_rejected(word in 1024u64..u64::MAX) {
        let codec = two_field_codec(10);
        prop_assert!(codec.decode(word).is_err());
    }

    #[test]
    fn encoded_word_is_smallest_match(category in prop::sample::select(vec!["low", "high", "flag"])) {
        let codec = two_field_codec(12);
        let matching = codec.matching_values(category).unwrap();
        prop_assert_eq!(matching.iter().next().copied(), Some(codec.encode(category).unwrap()));
    }
}

/// A field of a generated layout: its bits and the raw values it maps.
#[derive(Debug, Clone)]
struct GeneratedField {
    start: u32,
    width: u32,
    values: Vec<u64>,
}

impl GeneratedField {
    fn key(&self) -> String {
        format!("{}-{}", self.start, self.start + self.width - 1)
    }
}

fn category_name(field: usize, value: u64) -> String {
    format!("f{field}_v{value}")
}

/// Up to three adjacent or gapped fields of 1 to 3 bits, each mapping a
/// non-empty subset of its values. Words stay at most 12 bits wide.
fn layout_strategy() -> impl Strategy<Value = Vec<GeneratedField>> {
    prop::collection::vec((0u32..2, 1u32..=3), 1..=3).prop_flat_map(|shapes| {
        let mut next = 0;
        let mut fields = Vec::with_capacity(shapes.len());
        for (gap, width) in shapes {
            let start = next + gap;
            next = start + width;
            let values: Vec<u64> = (0..1u64 << width).collect();
            let count = values.len();
            fields.push(
                prop::sample::subsequence(values, 1..=count)
                    .prop_map(move |values| GeneratedField { start, width, values }),
            );
        }
        fields
    })
}

fn build_spec(fields: &[GeneratedField]) -> LayoutSpec {
    fields.iter().enumerate().fold(LayoutSpec::new(), |spec, (i, field)| {
        spec.field(
            field.key(),
            field.values.iter().map(|&value| (value, category_name(i, value))),
        )
    })
}

proptest! {
    #[test]
    fn generated_layouts_round_trip(fields in layout_strategy()) {
        let codec = BitFieldCodec::new(build_spec(&fields), None).unwrap();
        for name in codec.categories() {
            let word = codec.encode(name).unwrap();
            prop_assert!(codec.decode(word).unwrap().contains(&name));
            prop_assert!(codec.matches(word, name).unwrap());
        }
    }

    #[test]
    fn generated_fields_partition_domain(fields in layout_strategy()) {
        let codec = BitFieldCodec::new(build_spec(&fields), None).unwrap();
        let domain = domain(&codec);

        for (i, field) in fields.iter().enumerate() {
            let mut claimed = BTreeSet::new();
            for &value in &field.values {
                for word in codec.matching_values(&category_name(i, value)).unwrap() {
                    prop_assert!(claimed.insert(word), "word {} claimed twice in field {}", word, i);
                }
            }
            if field.values.len() == 1 << field.width {
                prop_assert_eq!(&claimed, &domain);
            } else {
                prop_assert!(claimed.len() < domain.len());
            }
        }

        for word in 0..codec.max_value() {
            prop_assert!(codec.decode(word).unwrap().len() <= fields.len());
        }
    }

    #[test]
    fn generated_and_or_not_algebra(
        fields in layout_strategy(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
    ) {
        let codec = BitFieldCodec::new(build_spec(&fields), None).unwrap();
        let names: Vec<&str> = codec.categories().collect();
        let chosen: Vec<&str> = picks.iter().map(|pick| names[pick.index(names.len())]).collect();

        let all = codec.matching_values_all(&chosen).unwrap();
        let any = codec.matching_values_any(&chosen).unwrap();
        let none = codec.non_matching_values(&chosen).unwrap();

        for name in &chosen {
            let matching = codec.matching_values(name).unwrap();
            prop_assert!(all.is_subset(&matching));
            prop_assert!(matching.is_subset(&any));
        }
        prop_assert!(any.is_disjoint(&none));
        prop_assert_eq!(any.len() + none.len(), codec.max_value() as usize);
    }

    #[test]
    fn value_mapped_twice_is_rejected(fields in layout_strategy(), which in any::<prop::sample::Index>()) {
        let target = which.index(fields.len());
        let value = fields[target].values[0];
        let mut spec = build_spec(&fields);
        spec.fields[target].categories.push((value, "repeated".to_string()));

        prop_assert_eq!(
            BitFieldCodec::new(spec, None).unwrap_err(),
            ConfigurationError::DuplicateValue { field: fields[target].key(), value }
        );
    }
}
