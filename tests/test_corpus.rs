#[cfg(test)]
mod tests {
    use aes_stimulus::encoder::{decode_input, decode_output};
    use aes_stimulus::transform::transform;
    use aes_stimulus::verify::{verify_corpus, Verdict};
    use aes_stimulus::{CorpusGenerator, Direction, Interface, RunConfig, Variant, VARIANTS};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn variant(name: &str) -> Variant {
        name.parse().unwrap()
    }

    fn run(config: &RunConfig, seed: u64) -> (String, String) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let (mut pkts_in, mut pkts_out) = (Vec::new(), Vec::new());
        CorpusGenerator::new(config).generate(&mut rng, &mut pkts_in, &mut pkts_out).unwrap();
        (String::from_utf8(pkts_in).unwrap(), String::from_utf8(pkts_out).unwrap())
    }

    fn payload_lens(v: &Variant, pkts_in: &str) -> Vec<usize> {
        pkts_in
            .lines()
            .enumerate()
            .map(|(i, l)| decode_input(v, l, i + 1).unwrap().input.len())
            .collect()
    }

    #[test]
    fn cbc_three_vectors_ramp_and_decrypt_back() {
        let v = variant("aes256_cbc_iter");
        let cfg = RunConfig::ramp(v, 3).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 3);

        assert_eq!(pkts_in.lines().count(), 3);
        assert_eq!(pkts_out.lines().count(), 3);
        assert_eq!(payload_lens(&v, &pkts_in), [16, 32, 48]);

        for (i, (l_in, l_out)) in pkts_in.lines().zip(pkts_out.lines()).enumerate() {
            let input = decode_input(&v, l_in, i + 1).unwrap();
            let output = decode_output(&v, l_out, i + 1).unwrap();
            assert_eq!(output.direction, Some(input.direction));

            // stimulus-out is the other side of the same transform
            let back_dir = match input.direction {
                Direction::Encrypt => Direction::Decrypt,
                Direction::Decrypt => Direction::Encrypt,
            };
            let back = transform(v.key_size, &input.key, &input.secondary, back_dir, &output.output).unwrap();
            assert_eq!(back, input.input, "line {}", i + 1);
        }
    }

    #[test]
    fn ctr_from_zero_records_nonce_and_zero_counter() {
        let v = variant("aes256_ctr32_unroll");
        let cfg = RunConfig::ramp(v, 2).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 11);

        let line2 = pkts_in.lines().nth(1).unwrap();
        assert!(!line2.contains(' '));
        // key (32) | nonce (12) | counter (4) | payload (2)
        assert_eq!(line2.len(), 2 * (32 + 16 + 2));
        assert_eq!(&line2[2 * 44..2 * 48], "00000000");
        assert_eq!(pkts_out.lines().nth(1).unwrap().len(), 4);
    }

    #[test]
    fn ecb_lines_have_no_direction_bit() {
        let v = variant("aes128_ecb_iter");
        let cfg = RunConfig::ramp(v, 4).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 5);
        assert!(pkts_in.lines().chain(pkts_out.lines()).all(|l| !l.contains(' ')));
        assert_eq!(payload_lens(&v, &pkts_in), [16, 32, 48, 64]);
    }

    #[test]
    fn ctr_ramp_grows_by_one_byte() {
        let v = variant("aes256_ctr_pipe");
        let cfg = RunConfig::ramp(v, 20).unwrap();
        let (pkts_in, _) = run(&cfg, 9);
        assert_eq!(payload_lens(&v, &pkts_in), (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn records_use_lowercase_hex_and_single_newlines() {
        let cfg = RunConfig::ramp(variant("aes128_cbc_iter"), 5).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 21);
        for text in [&pkts_in, &pkts_out] {
            assert!(text.ends_with('\n'));
            assert!(!text.ends_with("\n\n"));
            assert!(text
                .chars()
                .all(|c| c == ' ' || c == '\n' || c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn both_directions_appear() {
        let cfg = RunConfig::ramp(variant("aes256_ctr_iter"), 64).unwrap();
        let (pkts_in, _) = run(&cfg, 77);
        assert!(pkts_in.lines().any(|l| l.starts_with("1 ")));
        assert!(pkts_in.lines().any(|l| l.starts_with("0 ")));
    }

    #[test]
    fn keys_and_counters_are_not_reused() {
        let v = variant("aes256_ctr_comb");
        let cfg = RunConfig::ramp(v, 50).unwrap();
        let (pkts_in, _) = run(&cfg, 8);
        let mut seen = std::collections::HashSet::new();
        for (i, l) in pkts_in.lines().enumerate() {
            let rec = decode_input(&v, l, i + 1).unwrap();
            assert!(seen.insert(rec.key.clone()));
            assert!(seen.insert(rec.secondary.wire_bytes()));
        }
    }

    #[test]
    fn single_mode_uses_count_as_size() {
        let v = variant("aes256_cbc_comb");
        let cfg = RunConfig::new(v, 7, true, false, Interface::default()).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 1);
        assert_eq!(pkts_in.lines().count(), 1);
        assert_eq!(pkts_out.lines().count(), 1);
        assert_eq!(payload_lens(&v, &pkts_in), [7 * 16]);
    }

    #[test]
    fn corruption_inverts_only_last_byte() {
        let v = variant("aes256_ctr_iter");
        let clean = RunConfig::new(v, 9, true, false, Interface::default()).unwrap();
        let bad = RunConfig::new(v, 9, false, true, Interface::default()).unwrap();

        let (clean_in, clean_out) = run(&clean, 4);
        let (bad_in, bad_out) = run(&bad, 4);

        // same draws, same stimulus
        assert_eq!(clean_in, bad_in);
        assert_eq!(bad_out.lines().count(), 1);

        let good = decode_output(&v, clean_out.trim_end(), 1).unwrap().output;
        let corrupted = decode_output(&v, bad_out.trim_end(), 1).unwrap().output;
        assert_eq!(good.len(), 9);
        assert_eq!(good[..8], corrupted[..8]);
        assert_eq!(corrupted[8], !good[8]);

        let report = verify_corpus(&v, bad_in.as_bytes(), bad_out.as_bytes()).unwrap();
        assert_eq!(report.count(Verdict::Corrupted), 1);
        assert!(report.is_consistent());
    }

    #[test]
    fn ecb_single_mode_counts_blocks() {
        let v = variant("aes128_ecb_comb");
        let cfg = RunConfig::new(v, 4, true, false, Interface::default()).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 13);

        assert_eq!(pkts_in.lines().count(), 1);
        assert_eq!(pkts_out.lines().count(), 1);
        assert!(pkts_in.lines().chain(pkts_out.lines()).all(|l| !l.contains(' ')));
        assert_eq!(payload_lens(&v, &pkts_in), [4 * 16]);
        assert_eq!(pkts_out.trim_end().len(), 2 * 4 * 16);

        let report = verify_corpus(&v, pkts_in.as_bytes(), pkts_out.as_bytes()).unwrap();
        assert_eq!(report.count(Verdict::Match), 1);
    }

    #[test]
    fn ctr32_corruption_without_direction_bit() {
        let v = variant("aes128_ctr32_pipe");
        let clean = RunConfig::new(v, 9, true, false, Interface::default()).unwrap();
        let bad = RunConfig::new(v, 9, false, true, Interface::default()).unwrap();
        assert!(bad.corrupt);

        let (clean_in, clean_out) = run(&clean, 31);
        let (bad_in, bad_out) = run(&bad, 31);

        assert_eq!(clean_in, bad_in);
        assert_eq!(bad_in.lines().count(), 1);
        assert!(bad_in.lines().chain(bad_out.lines()).all(|l| !l.contains(' ')));

        let good = decode_output(&v, clean_out.trim_end(), 1).unwrap().output;
        let corrupted = decode_output(&v, bad_out.trim_end(), 1).unwrap().output;
        assert_eq!(good.len(), 9);
        assert_eq!(good[..8], corrupted[..8]);
        assert_eq!(corrupted[8], !good[8]);

        let report = verify_corpus(&v, bad_in.as_bytes(), bad_out.as_bytes()).unwrap();
        assert_eq!(report.count(Verdict::Corrupted), 1);
        assert!(report.is_consistent());
    }

    #[test]
    fn tampered_output_is_a_mismatch() {
        let v = variant("aes128_cbc_iter");
        let cfg = RunConfig::ramp(v, 3).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 2);

        let mut lines: Vec<String> = pkts_out.lines().map(str::to_string).collect();
        let first = lines[0].clone();
        let flipped = if first.as_bytes()[3] == b'0' { '1' } else { '0' };
        lines[0] = format!("{}{}{}", &first[..3], flipped, &first[4..]);
        let tampered = lines.join("\n") + "\n";

        let report = verify_corpus(&v, pkts_in.as_bytes(), tampered.as_bytes()).unwrap();
        assert_eq!(report.lines[0].verdict, Verdict::Mismatch);
        assert!(!report.is_consistent());
    }

    #[test]
    fn line_count_mismatch_is_reported() {
        let v = variant("aes256_ecb_unroll");
        let cfg = RunConfig::ramp(v, 3).unwrap();
        let (pkts_in, pkts_out) = run(&cfg, 6);
        let short: String = pkts_out.lines().take(2).map(|l| format!("{}\n", l)).collect();

        let report = verify_corpus(&v, pkts_in.as_bytes(), short.as_bytes()).unwrap();
        assert_eq!((report.in_lines, report.out_lines), (3, 2));
        assert!(!report.is_consistent());
    }

    #[test]
    fn same_seed_same_corpus() {
        for v in VARIANTS {
            let cfg = RunConfig::ramp(*v, 6).unwrap();
            assert_eq!(run(&cfg, 1234), run(&cfg, 1234), "{}", v.name);
        }
        let cfg = RunConfig::ramp(variant("aes256_cbc_iter"), 6).unwrap();
        assert_ne!(run(&cfg, 1), run(&cfg, 2));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_every_variant_round_trips(
            which in 0..VARIANTS.len(),
            n in 1usize..12,
            seed in any::<u64>(),
        ) {
            let v = VARIANTS[which];
            let cfg = RunConfig::ramp(v, n).unwrap();
            let (pkts_in, pkts_out) = run(&cfg, seed);

            prop_assert_eq!(pkts_in.lines().count(), n);
            prop_assert_eq!(pkts_out.lines().count(), n);

            let lens = payload_lens(&v, &pkts_in);
            prop_assert!(lens.windows(2).all(|w| w[0] < w[1]));

            let report = verify_corpus(&v, pkts_in.as_bytes(), pkts_out.as_bytes()).unwrap();
            prop_assert_eq!(report.count(Verdict::Match), n);
        }
    }
}
