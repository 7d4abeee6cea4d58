use base::prelude::*;

use super::*;

fn render(trace: &MultiplicationTrace) -> Vec<String> {
    trace
        .records()
        .map(|rec| rec.expect("the recurrence should not fail").to_string())
        .collect()
}

fn product_of(multiplicand: &str, multiplier: &str) -> String {
    multiply(multiplicand, multiplier)
        .expect("operands should be valid")
        .product()
        .expect("the recurrence should not fail")
        .to_string()
}

#[test]
fn test_seven_times_three() {
    assert_eq!(product_of("0111", "0011"), "00010101");
}

#[test]
fn test_eight_times_two() {
    assert_eq!(product_of("1000", "0010"), "00010000");
}

#[test]
fn test_zero_times_fifteen() {
    assert_eq!(product_of("0000", "1111"), "00000000");
}

#[test]
fn test_full_trace_of_seven_times_three() {
    let trace = multiply("0111", "0011").expect("operands should be valid");
    assert_eq!(
        render(&trace),
        vec![
            "    A: 00000111 00000000 0",
            "    S: 11111001 00000000 0",
            "    P: 00000000 00000011 0",
            "  P+S: 11111001 00000011 0",
            ">>1 P: 11111100 10000001 1",
            ">>1 P: 11111110 01000000 1",
            "  P+A: 00000101 01000000 1",
            ">>1 P: 00000010 10100000 0",
            ">>1 P: 00000001 01010000 0",
            ">>1 P: 00000000 10101000 0",
            ">>1 P: 00000000 01010100 0",
            ">>1 P: 00000000 00101010 0",
            ">>1 P: 00000000 00010101 0",
        ]
    );
}

#[test]
fn test_uneven_widths() {
    let trace = multiply("10", "1").expect("operands should be valid");
    assert_eq!(
        render(&trace),
        vec![
            "    A: 010 000 0",
            "    S: 110 000 0",
            "    P: 000 001 0",
            "  P+S: 110 001 0",
            ">>1 P: 111 000 1",
            "  P+A: 001 000 1",
            ">>1 P: 000 100 0",
            ">>1 P: 000 010 0",
        ]
    );
    assert_eq!(trace.product().map(|p| p.value()), Ok(2));
}

#[test]
fn test_records_are_restartable() {
    let trace = multiply("1011", "0110").expect("operands should be valid");
    let first = render(&trace);
    let second = render(&trace);
    assert_eq!(first, second);
    // A partially consumed iterator does not disturb a new one.
    let mut partial = trace.records();
    let _ = partial.nth(5);
    assert_eq!(render(&trace), first);
}

#[test]
fn test_record_accessors() {
    let trace = multiply("10", "1").expect("operands should be valid");
    let first = trace
        .records()
        .next()
        .expect("there is always an A record")
        .expect("the A record cannot fail");
    assert_eq!(first.label, Label::A);
    assert_eq!(first.register, trace.registers().a);
    assert_eq!(first.formatted(), "010 000 0");

    // A multiplicand of 1 sits at the bottom of the upper group.
    let trace = multiply("01", "1").expect("operands should be valid");
    let first = trace
        .records()
        .next()
        .expect("there is always an A record")
        .expect("the A record cannot fail");
    assert_eq!(first.formatted(), "001 000 0");
}

#[test]
fn test_steps_and_product_agree() {
    let trace = multiply("1101", "101").expect("operands should be valid");
    let mut steps = trace.steps();
    assert_eq!(steps.final_product(), None);
    let collected: Vec<Step> = steps
        .by_ref()
        .map(|s| s.expect("the recurrence should not fail"))
        .collect();
    assert_eq!(collected.len(), 7);
    let last = collected.last().expect("there are steps");
    assert_eq!(steps.current_p(), last.shifted);
    assert_eq!(steps.final_product(), Some(trace.product()));
    assert_eq!(trace.product().map(|p| p.value()), Ok(13 * 5));
}

#[test]
fn test_sum_present_only_for_additions() {
    let trace = multiply("111", "1001").expect("operands should be valid");
    for step in trace.steps() {
        let step = step.expect("the recurrence should not fail");
        assert_eq!(step.sum.is_some(), step.action != Action::Hold);
    }
}

#[test]
fn test_empty_multiplicand() {
    assert_eq!(
        multiply("", "0011"),
        Err(Error::InvalidOperand {
            role: Role::Multiplicand,
            fault: OperandFault::Empty,
        })
    );
}

#[test]
fn test_bad_multiplier_digit() {
    assert_eq!(
        multiply("0111", "0121"),
        Err(Error::InvalidOperand {
            role: Role::Multiplier,
            fault: OperandFault::NotBinary {
                position: 2,
                found: '2',
            },
        })
    );
}

#[test]
fn test_bad_digit_beats_overflow() {
    let wide = "1".repeat(40);
    assert!(matches!(
        multiply(&wide, "2"),
        Err(Error::InvalidOperand {
            role: Role::Multiplier,
            ..
        })
    ));
}

#[test]
fn test_width_overflow() {
    assert_eq!(
        multiply(&"1".repeat(16), &"1".repeat(16)),
        Err(Error::RegisterWidthOverflow(WidthOverflow {
            required: 65,
            available: 64,
        }))
    );
    assert!(multiply(&"1".repeat(16), &"1".repeat(15)).is_ok());
}

#[test]
fn test_widest_product() {
    let m = "1".repeat(16);
    let r = "1".repeat(15);
    let trace = multiply(&m, &r).expect("operands should be valid");
    assert_eq!(trace.geometry().total_bits(), 63);
    assert_eq!(
        trace.product().map(|p| p.value()),
        Ok(0xFFFF_u64 * 0x7FFF_u64)
    );
}

#[test]
fn test_strip_leading_zeros() {
    let options = Options {
        leading_zeros: LeadingZeros::Strip,
    };
    let trace = multiply_with("0111", "0011", &options).expect("operands should be valid");
    assert_eq!(trace.geometry().product_bits(), 5);
    assert_eq!(trace.steps().count(), 5);
    assert_eq!(
        trace.product().map(|p| p.to_string()),
        Ok("10101".to_string())
    );
    // Stripping makes room for operands that would otherwise overflow.
    let padded = format!("{}1", "0".repeat(40));
    assert!(multiply(&padded, "1").is_err());
    assert!(multiply_with(&padded, "1", &options).is_ok());
}

#[test]
fn test_product_signed_view() {
    let trace = multiply("111", "1").expect("operands should be valid");
    let product = trace.product().expect("the recurrence should not fail");
    assert_eq!(product.value(), 7);
    assert_eq!(product.register().width(), 4);
    assert_eq!(product.as_signed(), 7);
}

mod proptests {
    use super::*;
    use test_strategy::{proptest, Arbitrary};

    #[derive(Debug, Arbitrary)]
    struct Operands {
        #[strategy(1..=16u32)]
        multiplicand_bits: u32,
        #[strategy(1..=(31 - #multiplicand_bits))]
        multiplier_bits: u32,
        #[strategy(0..(1u64 << #multiplicand_bits))]
        multiplicand: u64,
        #[strategy(0..(1u64 << #multiplier_bits))]
        multiplier: u64,
    }

    impl Operands {
        fn strings(&self) -> (String, String) {
            (
                format!(
                    "{:0width$b}",
                    self.multiplicand,
                    width = self.multiplicand_bits as usize
                ),
                format!(
                    "{:0width$b}",
                    self.multiplier,
                    width = self.multiplier_bits as usize
                ),
            )
        }

        fn trace(&self) -> MultiplicationTrace {
            let (m, r) = self.strings();
            multiply(&m, &r).expect("strategy should produce valid operands")
        }
    }

    #[proptest]
    fn product_is_correct(input: Operands) {
        let product = input
            .trace()
            .product()
            .expect("the recurrence should not fail");
        assert_eq!(product.value(), input.multiplicand * input.multiplier);
        assert_eq!(
            product.register().width(),
            input.multiplicand_bits + input.multiplier_bits
        );
    }

    #[proptest]
    fn runs_exactly_product_bits_steps(input: Operands) {
        let trace = input.trace();
        let shifts = trace
            .records()
            .filter(|rec| matches!(rec, Ok(TraceRecord { label: Label::Shifted, .. })))
            .count();
        let expected = (input.multiplicand_bits + input.multiplier_bits) as usize;
        assert_eq!(shifts, expected);
        assert_eq!(trace.steps().count(), expected);
    }

    #[proptest]
    fn multiplication_is_deterministic(input: Operands) {
        let (m, r) = input.strings();
        let first = multiply(&m, &r).expect("strategy should produce valid operands");
        let second = multiply(&m, &r).expect("strategy should produce valid operands");
        assert_eq!(render(&first), render(&second));
        assert_eq!(first.product(), second.product());
    }

    #[proptest]
    fn shifts_preserve_sign(input: Operands) {
        let trace = input.trace();
        let mut p = trace.registers().p;
        for step in trace.steps() {
            let step = step.expect("the recurrence should not fail");
            let before = step.sum.unwrap_or(p);
            assert_eq!(step.shifted.as_signed(), before.as_signed() >> 1);
            assert_eq!(step.shifted.sign_bit(), before.sign_bit());
            p = step.shifted;
        }
    }

    #[proptest]
    fn every_record_is_total_bits_wide(input: Operands) {
        let trace = input.trace();
        let total = trace.geometry().total_bits() as usize;
        for rec in trace.records() {
            let rec = rec.expect("the recurrence should not fail");
            let digits = rec.formatted().replace(' ', "");
            assert_eq!(digits.len(), total);
            let reparsed: Register = digits.parse().expect("formatted registers should parse");
            assert_eq!(reparsed, rec.register);
        }
    }
}
