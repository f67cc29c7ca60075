//! Baseline ElectionGuard parameters.
//!
//! The standard 4096-bit modulus, 256-bit subgroup order, and generator,
//! embedded as build-time constants. The verifier compares a record's
//! declared parameters against these values; the defining identities
//! (`q = 2^256 - 189`, `p = 2^4096 - 69q - c`, `g = 2^((p-1)/q) mod p`)
//! are pinned by tests.

use std::sync::{Arc, LazyLock};

use egvr_arith::Natural;

use crate::ModPGroup;

/// Hex digits of the baseline prime modulus `p`.
const P_HEX: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFBAFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFE0175E30B1B0E791DB502994F24DFB1";

/// Hex digits of the baseline subgroup order `q`.
const Q_HEX: &str = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF43";

/// Hex digits of the baseline generator `g`.
const G_HEX: &str = "9B61C275E06F3E38372F9A9ADE0CDC4C82F4CE5337B3EF0ED28BEDBC01342EB89977C8116D741270D45B0EBE12D96C5AEE997FEFDEA18569018AFE1284E702BB9B8C78E03E697F378D25BCBCB94FEFD12B7F97047F63423268881C3B96B389E134CB3162CB73ED8052F7946C7E72907FD8B96862D443B5C26F7B0E3FDC9F035CBF0F5AAB670B79011A8BCDEBCF421CC9CBBE12C788E50328041EB59D81079497B667B96049DA04C79D60F527B1C02F7ECBA66849179CB5CFBE7C990CD888B69C44171E4F54C21A8CFE9D821F195F7553B73A705707263EAEA3B7AFA7DED79ACF5A64F3BFB939B815C52085F40714F4C6460B0B0C3598E31746A06C2A3457676CB345C8A390EBB9428CEECEFA6FCB1C27A9E527A6C55B8D6B2B1868D6EC719E189A799605C540F8641F135D5DC7FB62D58E0DE0B6AE3AB90E91FB996505D7D9283DA833FF0CB6CC8CA7BAFA0E90BB1ADB81545A801F0016DC7088A4DF2CFB7D6DD876A2A5807BDAA4000DAFA2DFB6FBB0ED9D775589156DDBFC24FF2203FFF9C5CF7C85C68F66DE94C98331F50FEF59CF8E7CE9D95FA008F7C1672D269C163751012826C4C8F5B5F4C11EDB62550F3CF93D86F3CC6E22B0E769AC659157F40383B5DF9DB9F8414F6CB5FA7D17BDDD3BC90DC7BDC39BAF3BE602A99E2A37CE3A5C098A8C1EFD3CD28A6B79306CA2C20C55174218A3935F697E813628D2D861BE54";

static MODULUS: LazyLock<Natural> = LazyLock::new(|| parse(P_HEX));
static ORDER: LazyLock<Natural> = LazyLock::new(|| parse(Q_HEX));
static GENERATOR: LazyLock<Natural> = LazyLock::new(|| parse(G_HEX));

static GROUP: LazyLock<Arc<ModPGroup>> = LazyLock::new(|| {
    ModPGroup::new(
        baseline_modulus().clone(),
        baseline_order().clone(),
        baseline_generator().clone(),
    )
    .expect("baseline parameters form a valid group")
});

fn parse(hex: &str) -> Natural {
    Natural::from_hex(hex).expect("valid hex constant")
}

/// The baseline prime modulus `p`.
#[must_use]
pub fn baseline_modulus() -> &'static Natural {
    &MODULUS
}

/// The baseline subgroup order `q`.
#[must_use]
pub fn baseline_order() -> &'static Natural {
    &ORDER
}

/// The baseline generator `g`.
#[must_use]
pub fn baseline_generator() -> &'static Natural {
    &GENERATOR
}

/// The baseline group, constructed (and generator-checked) once.
#[must_use]
pub fn baseline_group() -> &'static Arc<ModPGroup> {
    &GROUP
}

#[cfg(test)]
mod tests {
    use egvr_arith::mod_pow;

    use super::*;

    #[test]
    fn order_is_2_pow_256_minus_189() {
        let expected = Natural::one()
            .shl(256)
            .sub(&Natural::from(189u32))
            .expect("sub");
        assert_eq!(baseline_order(), &expected);
    }

    #[test]
    fn modulus_matches_its_defining_expression() {
        // p = 2^4096 - 69q - 2650872664557734482243044168410288960
        let correction = Natural::from_decimal("2650872664557734482243044168410288960")
            .expect("decimal");
        let expected = Natural::one()
            .shl(4096)
            .sub(&baseline_order().mul(&Natural::from(69u32)))
            .expect("sub")
            .sub(&correction)
            .expect("sub");
        assert_eq!(baseline_modulus(), &expected);
    }

    #[test]
    fn generator_matches_its_defining_expression() {
        // g = 2^((p-1)/q) mod p
        let p_minus_1 = baseline_modulus().sub(&Natural::one()).expect("sub");
        let (cofactor, rem) = p_minus_1.div_rem(baseline_order()).expect("divide");
        assert!(rem.is_zero());
        let expected =
            mod_pow(&Natural::from(2u32), &cofactor, baseline_modulus()).expect("pow");
        assert_eq!(baseline_generator(), &expected);
    }

    #[test]
    fn baseline_group_builds() {
        let group = baseline_group();
        assert_eq!(group.modulus(), baseline_modulus());
        assert_eq!(group.order(), baseline_order());
        assert_eq!(group.byte_len(), 512);
    }
}
