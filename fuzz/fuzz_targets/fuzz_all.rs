#![no_main]

use libfuzzer_sys::fuzz_target;
use round5::r5n1_toy;
use round5::traits::{Decrypt, Encrypt, KeyGen, SerDes};

fuzz_target!(|data: [u8; 16+397+380]| {  // sk_len + ct_len + pk_len = 793

    // Deserialize a 'fuzzy' secret key; every byte string of the right length is a valid seed
    let sk = r5n1_toy::PrivateKey::try_from_bytes(data[0..16].try_into().unwrap());
    let ct = r5n1_toy::CipherText::try_from_bytes(data[16..16+397].try_into().unwrap());

    // Decryption of arbitrary ciphertexts must not panic
    if let (Ok(sk), Ok(ct)) = (sk, ct) {
        let _msg = sk.try_decrypt(&ct);
    }


    // Deserialize a 'fuzzy' public key and encrypt to it
    let pk = r5n1_toy::PublicKey::try_from_bytes(data[16+397..16+397+380].try_into().unwrap());
    if let Ok(pk) = pk {
        let ct2 = pk.encrypt_from_seed(&[0u8; 16], &data[0..16]).unwrap();
        let _ = ct2.into_bytes();
    }


    // A good key pair still round trips a fuzzy message
    let (pk, sk) = r5n1_toy::KG::keygen_from_seed(&data[0..16], &data[16..32]).unwrap();
    let msg: [u8; 16] = data[32..48].try_into().unwrap();
    let ct3 = pk.encrypt_from_seed(&msg, &data[48..64]).unwrap();
    assert_eq!(*sk.try_decrypt(&ct3).unwrap(), msg);
});
