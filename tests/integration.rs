use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;
use round5::params::{Parameters, ALL_PARAMETER_SETS, R5N1_1PKE_0C, R5N1_3PKE_0SMALLCT, R5N1_TOY, R5ND_1KEM_0C};
use round5::traits::{Decaps, Decrypt, Encaps, Encrypt, KeyGen, SerDes};
use round5::{cca_kem, cca_pke, cpa_kem, cpa_pke, Error, SharedMatrix};

// cargo flamegraph --test integration

fn init_logging() { let _ = env_logger::builder().is_test(true).try_init(); }


// $ cargo test --release -- --nocapture --ignored
#[ignore]
#[test]
fn forever() {
    let mut msg = [0u8; round5::r5nd_1pke_5c::MSG_LEN];
    let mut i = 0u64;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    loop {
        rng.fill_bytes(&mut msg);
        let (pk, sk) = round5::r5nd_1pke_5c::KG::try_keygen_with_rng(&mut rng).unwrap();
        let ct = pk.try_encrypt_with_rng(&mut rng, &msg).unwrap();
        assert_eq!(*sk.try_decrypt(&ct).unwrap(), msg);
        if i % 10000 == 0 {
            println!("So far i: {}", i)
        };
        i += 1;
    }
}


macro_rules! namespace_rounds {
    ($name:ident, $ns:ident, $seed:expr, $rounds:expr) => {
        #[test]
        fn $name() {
            use round5::$ns;
            let mut msg = [0u8; $ns::MSG_LEN];
            let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64($seed);
            for i in 0..$rounds {
                rng.fill_bytes(&mut msg);
                let (pk, sk) = $ns::KG::try_keygen_with_rng(&mut rng).unwrap();
                let ct = pk.try_encrypt_with_rng(&mut rng, &msg).unwrap();
                assert_eq!(*sk.try_decrypt(&ct).unwrap(), msg, "round {}", i);

                // Serialized forms have the advertised sizes and survive a round trip
                let sk2 = $ns::PrivateKey::try_from_bytes(sk.into_bytes()).unwrap();
                let ct2 = $ns::CipherText::try_from_bytes(ct.into_bytes()).unwrap();
                assert_eq!(*sk2.try_decrypt(&ct2).unwrap(), msg);
                assert_eq!(pk.into_bytes().len(), $ns::PK_LEN);
            }
        }
    };
}

namespace_rounds!(test_r5nd_1kem_0c_rounds, r5nd_1kem_0c, 1, 8);
namespace_rounds!(test_r5nd_3kem_0c_rounds, r5nd_3kem_0c, 2, 4);
namespace_rounds!(test_r5nd_5kem_0c_rounds, r5nd_5kem_0c, 3, 4);
namespace_rounds!(test_r5nd_1pke_0c_rounds, r5nd_1pke_0c, 4, 4);
namespace_rounds!(test_r5nd_3pke_0c_rounds, r5nd_3pke_0c, 5, 4);
namespace_rounds!(test_r5nd_5pke_0c_rounds, r5nd_5pke_0c, 6, 4);
namespace_rounds!(test_r5nd_1kem_5c_rounds, r5nd_1kem_5c, 7, 8);
namespace_rounds!(test_r5nd_3kem_5c_rounds, r5nd_3kem_5c, 8, 4);
namespace_rounds!(test_r5nd_5kem_5c_rounds, r5nd_5kem_5c, 9, 4);
namespace_rounds!(test_r5nd_1pke_5c_rounds, r5nd_1pke_5c, 10, 4);
namespace_rounds!(test_r5nd_3pke_5c_rounds, r5nd_3pke_5c, 11, 4);
namespace_rounds!(test_r5nd_5pke_5c_rounds, r5nd_5pke_5c, 12, 4);
namespace_rounds!(test_r5n1_1kem_0c_rounds, r5n1_1kem_0c, 13, 2);
namespace_rounds!(test_r5n1_3kem_0c_rounds, r5n1_3kem_0c, 14, 2);
namespace_rounds!(test_r5n1_5kem_0c_rounds, r5n1_5kem_0c, 15, 1);
namespace_rounds!(test_r5n1_1pke_0c_rounds, r5n1_1pke_0c, 16, 2);
namespace_rounds!(test_r5n1_3pke_0c_rounds, r5n1_3pke_0c, 17, 2);
namespace_rounds!(test_r5n1_5pke_0c_rounds, r5n1_5pke_0c, 18, 1);
namespace_rounds!(test_r5nd_0kem_2iot_rounds, r5nd_0kem_2iot, 19, 8);
namespace_rounds!(test_r5nd_1kem_4longkey_rounds, r5nd_1kem_4longkey, 20, 8);
namespace_rounds!(test_r5n1_3pke_0smallct_rounds, r5n1_3pke_0smallct, 21, 2);
namespace_rounds!(test_r5n1_toy_rounds, r5n1_toy, 22, 32);


#[test]
fn test_namespace_sizes_match_parameter_sets() {
    assert_eq!(round5::r5nd_1kem_0c::PK_LEN, 634);
    assert_eq!(round5::r5nd_1kem_0c::CT_LEN, 682);
    assert_eq!(round5::r5n1_toy::PK_LEN, 380);
    assert_eq!(round5::r5n1_toy::CT_LEN, 397);
    assert_eq!(round5::r5n1_toy::SK_LEN, 16);
    assert_eq!(round5::r5n1_3pke_0smallct::MSG_LEN, R5N1_3PKE_0SMALLCT.kappa_bytes);
    for set in ALL_PARAMETER_SETS {
        assert!(Parameters::try_new(&set, 0).is_ok(), "{}", set.name);
    }
}


#[test]
fn test_wrong_key_does_not_decrypt() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(31);
    let msg = [0x3Cu8; round5::r5nd_1kem_5c::MSG_LEN];
    let (pk, _sk) = round5::r5nd_1kem_5c::try_keygen_with_rng(&mut rng).unwrap();
    let (_pk, other_sk) = round5::r5nd_1kem_5c::try_keygen_with_rng(&mut rng).unwrap();
    let ct = pk.try_encrypt_with_rng(&mut rng, &msg).unwrap();
    assert_ne!(*other_sk.try_decrypt(&ct).unwrap(), msg);
}


#[test]
fn test_deterministic_from_seed() {
    use round5::r5nd_0kem_2iot as ns;
    let (pk1, sk1) = ns::KG::keygen_from_seed(&[1u8; 16], &[2u8; 16]).unwrap();
    let (pk2, _) = ns::KG::keygen_from_seed(&[1u8; 16], &[2u8; 16]).unwrap();
    let (pk3, _) = ns::KG::keygen_from_seed(&[1u8; 16], &[3u8; 16]).unwrap();
    assert_eq!(pk1, pk2);
    assert_ne!(pk1, pk3);
    // The secret key is the secret seed
    assert_eq!(sk1.into_bytes(), [2u8; 16]);

    let msg = [9u8; ns::MSG_LEN];
    let ct1 = pk1.encrypt_from_seed(&msg, &[5u8; 16]).unwrap();
    let ct2 = pk2.encrypt_from_seed(&msg, &[5u8; 16]).unwrap();
    let ct3 = pk2.encrypt_from_seed(&msg, &[6u8; 16]).unwrap();
    assert_eq!(ct1, ct2);
    assert_ne!(ct1, ct3);

    assert!(matches!(ns::KG::keygen_from_seed(&[1u8; 15], &[2u8; 16]), Err(Error::MalformedInput { .. })));
    assert!(matches!(pk1.encrypt_from_seed(&msg, &[5u8; 17]), Err(Error::MalformedInput { .. })));
}


#[test]
fn test_tau_variants_round_trip() {
    init_logging();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(99);
    for set in [R5N1_TOY, R5N1_1PKE_0C] {
        let shared = SharedMatrix::new();
        let mut seed = vec![0u8; set.kappa_bytes];
        rng.fill_bytes(&mut seed);
        shared.init(&Parameters::try_new(&set, 1).unwrap(), &seed).unwrap();

        for tau in 0..=2 {
            let params = Parameters::try_new(&set, tau).unwrap();
            let shared = if tau == 1 { Some(&shared) } else { None };
            for _ in 0..4 {
                let mut msg = vec![0u8; set.kappa_bytes];
                rng.fill_bytes(&mut msg);
                let (pk, sk) = cpa_pke::try_keygen_with_rng(&params, shared, &mut rng).unwrap();
                assert_eq!(pk.len(), set.pk_size());
                let ct = cpa_pke::try_encrypt_with_rng(&params, shared, &pk, &msg, &mut rng).unwrap();
                assert_eq!(ct.len(), set.ct_size());
                assert_eq!(cpa_pke::decrypt(&params, &sk, &ct).unwrap().as_slice(), msg.as_slice());
            }
        }
    }
}


#[test]
fn test_tau_changes_public_key() {
    let sigma = [0x11u8; 16];
    let sk = [0x22u8; 16];
    let shared = SharedMatrix::new();
    shared.init(&Parameters::try_new(&R5N1_TOY, 1).unwrap(), &[0x33u8; 16]).unwrap();
    let pks: Vec<Vec<u8>> = (0..=2)
        .map(|tau| {
            let params = Parameters::try_new(&R5N1_TOY, tau).unwrap();
            cpa_pke::keygen_from_seed(&params, Some(&shared), &sigma, &sk).unwrap().0
        })
        .collect();
    assert_ne!(pks[0], pks[1]);
    assert_ne!(pks[1], pks[2]);
    assert_ne!(pks[0], pks[2]);
    // sigma is carried in the clear at the front of every public key
    for pk in &pks {
        assert_eq!(&pk[..16], &sigma);
    }
}


#[test]
fn test_tau2_custom_pool_size() {
    let params = Parameters::try_with_tau2_len(&R5N1_TOY, 2, 64).unwrap();
    let (pk, sk) = cpa_pke::keygen_from_seed(&params, None, &[1u8; 16], &[2u8; 16]).unwrap();
    let ct = cpa_pke::encrypt(&params, None, &pk, &[3u8; 16], &[4u8; 16]).unwrap();
    assert_eq!(cpa_pke::decrypt(&params, &sk, &ct).unwrap().as_slice(), &[3u8; 16]);

    assert!(Parameters::try_with_tau2_len(&R5N1_TOY, 2, 48).is_err()); // not a power of two
    assert!(Parameters::try_with_tau2_len(&R5N1_TOY, 2, 32).is_err()); // smaller than d
    assert!(Parameters::try_with_tau2_len(&R5N1_TOY, 2, 1 << 17).is_err());
}


#[test]
fn test_constant_time_and_variable_time_agree() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2024);
    for set in [R5ND_1KEM_0C, round5::params::R5ND_1PKE_5C, R5N1_TOY, R5N1_1PKE_0C] {
        let params = Parameters::try_new(&set, 0).unwrap();
        let mut seeds = vec![0u8; 4 * set.kappa_bytes];
        rng.fill_bytes(&mut seeds);
        let (sigma, rest) = seeds.split_at(set.kappa_bytes);
        let (sk_seed, rest) = rest.split_at(set.kappa_bytes);
        let (msg, rho) = rest.split_at(set.kappa_bytes);

        let (pk_ct, sk) = cpa_pke::keygen_from_seed(&params, None, sigma, sk_seed).unwrap();
        let (pk_vt, _) = cpa_pke::keygen_from_seed_vt(&params, None, sigma, sk_seed).unwrap();
        assert_eq!(pk_ct, pk_vt, "{}", set.name);

        let ct_ct = cpa_pke::encrypt(&params, None, &pk_ct, msg, rho).unwrap();
        let ct_vt = cpa_pke::encrypt_vt(&params, None, &pk_ct, msg, rho).unwrap();
        assert_eq!(ct_ct, ct_vt, "{}", set.name);

        assert_eq!(cpa_pke::decrypt(&params, &sk, &ct_ct).unwrap(), cpa_pke::decrypt_vt(&params, &sk, &ct_ct).unwrap());
        assert_eq!(cpa_pke::decrypt_vt(&params, &sk, &ct_vt).unwrap().as_slice(), msg);
    }
}


#[test]
fn test_malformed_inputs() {
    init_logging();
    let params = Parameters::try_new(&R5N1_TOY, 0).unwrap();
    let (pk, sk) = cpa_pke::keygen_from_seed(&params, None, &[1u8; 16], &[2u8; 16]).unwrap();
    let ct = cpa_pke::encrypt(&params, None, &pk, &[3u8; 16], &[4u8; 16]).unwrap();

    let expect_malformed = |r: Result<_, Error>| assert!(matches!(r, Err(Error::MalformedInput { .. })));
    expect_malformed(cpa_pke::encrypt(&params, None, &pk[1..], &[3u8; 16], &[4u8; 16]).map(|_| ()));
    expect_malformed(cpa_pke::encrypt(&params, None, &pk, &[3u8; 15], &[4u8; 16]).map(|_| ()));
    expect_malformed(cpa_pke::encrypt(&params, None, &pk, &[3u8; 16], &[]).map(|_| ()));
    expect_malformed(cpa_pke::decrypt(&params, &sk, &ct[..ct.len() - 1]).map(|_| ()));
    expect_malformed(cpa_pke::decrypt(&params, &sk[1..], &ct).map(|_| ()));
    expect_malformed(cpa_pke::keygen_from_seed(&params, None, &[1u8; 16], &[2u8; 32]).map(|_| ()));

    // Ring parameters only support tau=0; tau=1 needs an initialized shared pool
    assert!(matches!(Parameters::try_new(&R5ND_1KEM_0C, 1), Err(Error::InvalidParameters(_))));
    assert!(matches!(Parameters::try_new(&R5N1_TOY, 3), Err(Error::InvalidParameters(_))));
    let tau1 = Parameters::try_new(&R5N1_TOY, 1).unwrap();
    assert_eq!(
        cpa_pke::keygen_from_seed(&tau1, None, &[1u8; 16], &[2u8; 16]).err(),
        Some(Error::UninitializedSharedState)
    );
}


#[test]
fn test_kem_over_all_families() {
    init_logging();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(555);
    for set in [R5ND_1KEM_0C, round5::params::R5ND_0KEM_2IOT, round5::params::R5N1_1KEM_0C] {
        let params = Parameters::try_new(&set, 0).unwrap();
        let (pk, sk) = cca_kem::try_keygen_with_rng(&params, None, &mut rng).unwrap();
        let (ct, k) = cca_kem::try_encaps_with_rng(&params, None, &pk, &mut rng).unwrap();
        assert_eq!(k.len(), set.kappa_bytes);
        assert_eq!(cca_kem::decaps(&params, None, &sk, &ct).unwrap(), k);
    }
}


macro_rules! namespace_kem_rounds {
    ($name:ident, $ns:ident, $seed:expr, $rounds:expr) => {
        #[test]
        fn $name() {
            use round5::$ns;
            let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64($seed);
            for i in 0..$rounds {
                let (pk, sk) = $ns::try_keygen_with_rng(&mut rng).unwrap();
                let (ct, ssk_sender) = pk.try_encaps_with_rng(&mut rng).unwrap();
                let ct = $ns::CipherText::try_from_bytes(ct.into_bytes()).unwrap();
                assert_eq!(*sk.try_decaps(&ct).unwrap(), *ssk_sender, "round {}", i);
                assert_eq!($ns::SS_LEN, $ns::MSG_LEN);
            }
        }
    };
}

namespace_kem_rounds!(test_r5nd_1kem_0c_kem_rounds, r5nd_1kem_0c, 31, 4);
namespace_kem_rounds!(test_r5nd_3kem_0c_kem_rounds, r5nd_3kem_0c, 32, 2);
namespace_kem_rounds!(test_r5nd_5kem_0c_kem_rounds, r5nd_5kem_0c, 33, 2);
namespace_kem_rounds!(test_r5nd_1kem_5c_kem_rounds, r5nd_1kem_5c, 34, 4);
namespace_kem_rounds!(test_r5nd_3kem_5c_kem_rounds, r5nd_3kem_5c, 35, 2);
namespace_kem_rounds!(test_r5nd_5kem_5c_kem_rounds, r5nd_5kem_5c, 36, 2);
namespace_kem_rounds!(test_r5n1_1kem_0c_kem_rounds, r5n1_1kem_0c, 37, 1);
namespace_kem_rounds!(test_r5n1_3kem_0c_kem_rounds, r5n1_3kem_0c, 38, 1);
namespace_kem_rounds!(test_r5n1_5kem_0c_kem_rounds, r5n1_5kem_0c, 39, 1);
namespace_kem_rounds!(test_r5nd_0kem_2iot_kem_rounds, r5nd_0kem_2iot, 40, 4);
namespace_kem_rounds!(test_r5nd_1kem_4longkey_kem_rounds, r5nd_1kem_4longkey, 41, 4);


#[test]
fn test_namespace_kem_matches_runtime_cpa_kem() {
    use round5::r5nd_1kem_5c;
    let params = Parameters::try_new(&round5::params::R5ND_1KEM_5C, 0).unwrap();
    let (pk, sk) = r5nd_1kem_5c::KG::keygen_from_seed(&[1u8; 16], &[2u8; 16]).unwrap();
    let (ct, ssk) = pk.encaps_from_seed(&[3u8; 16], &[4u8; 16]).unwrap();

    let pk_bytes = pk.into_bytes();
    let (ct_rt, ssk_rt) = cpa_kem::encaps_from_seed(&params, None, &pk_bytes, &[3u8; 16], &[4u8; 16]).unwrap();
    assert_eq!(ct.clone().into_bytes().as_slice(), ct_rt.as_slice());
    assert_eq!(ssk.as_slice(), ssk_rt.as_slice());
    assert_eq!(cpa_kem::decaps(&params, &sk.into_bytes(), &ct_rt).unwrap().as_slice(), ssk.as_slice());
}


#[test]
fn test_cca_pke_over_families_and_tau() {
    init_logging();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(777);
    let shared = SharedMatrix::new();
    shared.init(&Parameters::try_new(&R5N1_TOY, 1).unwrap(), &[6u8; 16]).unwrap();
    let msg = b"Round5 hybrid encryption carries messages of any length.";
    for (set, tau) in [(round5::params::R5ND_1PKE_5C, 0), (R5N1_1PKE_0C, 0), (R5N1_TOY, 1), (R5N1_TOY, 2)] {
        let params = Parameters::try_new(&set, tau).unwrap();
        let shared = (tau == 1).then_some(&shared);
        let (pk, sk) = cca_pke::try_keygen_with_rng(&params, shared, &mut rng).unwrap();
        let ct = cca_pke::try_encrypt_with_rng(&params, shared, &pk, msg, &mut rng).unwrap();
        assert_eq!(ct.len(), set.cca_ct_size() + msg.len() + 16);
        assert_eq!(cca_pke::decrypt(&params, shared, &sk, &ct).unwrap().as_slice(), msg.as_slice());

        // A truncated tag fails authentication
        assert_eq!(cca_pke::decrypt(&params, shared, &sk, &ct[..ct.len() - 1]), Err(Error::Dem));
    }
}
