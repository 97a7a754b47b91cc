#![no_main]
use libfuzzer_sys::fuzz_target;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use round5::{cca_kem, cca_pke, cpa_kem};
use round5::params::{Parameters, R5ND_0KEM_2IOT, R5N1_TOY};


// Helper to create deterministic RNG from data
fn create_rng(seed_data: &[u8]) -> ChaCha20Rng {
    let mut arr = [0u8; 32];
    let len = seed_data.len().min(32);
    arr[..len].copy_from_slice(&seed_data[..len]);
    ChaCha20Rng::from_seed(arr)
}


fuzz_target!(|data: &[u8]| {
    for set in [R5N1_TOY, R5ND_0KEM_2IOT] {
        let params = Parameters::try_new(&set, 0).unwrap();
        let mut rng = create_rng(data);
        let (pk, sk) = cca_kem::try_keygen_with_rng(&params, None, &mut rng).unwrap();

        // Arbitrary bytes: wrong lengths are errors, right lengths are implicitly rejected
        let result = cca_kem::decaps(&params, None, &sk, data);
        assert_eq!(result.is_ok(), data.len() == set.cca_ct_size());

        // Arbitrary public keys and secret keys of the right length never panic
        if data.len() >= set.pk_size() {
            let _ = cca_kem::encaps_from_seed(&params, None, &data[..set.pk_size()], &pk[..set.kappa_bytes]);
        }
        if data.len() >= set.cca_sk_size() {
            let (ct, _) = cca_kem::try_encaps_with_rng(&params, None, &pk, &mut rng).unwrap();
            let _ = cca_kem::decaps(&params, None, &data[..set.cca_sk_size()], &ct);
        }

        // Arbitrary CCA-PKE ciphertexts are rejected, never decrypted
        let result = cca_pke::decrypt(&params, None, &sk, data);
        assert!(result.is_err());

        // The CPA KEM decapsulates any ciphertext of the right length
        let (cpa_pk, cpa_sk) = cpa_kem::try_keygen_with_rng(&params, None, &mut rng).unwrap();
        let result = cpa_kem::decaps(&params, &cpa_sk, data);
        assert_eq!(result.is_ok(), data.len() == set.ct_size());
        let (ct, k) = cpa_kem::try_encaps_with_rng(&params, None, &cpa_pk, &mut rng).unwrap();
        assert_eq!(cpa_kem::decaps(&params, &cpa_sk, &ct).unwrap(), k);
    }
});
