use dudect_bencher::{ctbench_main, BenchRng, Class, CtRunner};
use round5::r5nd_1kem_5c; // Could also be any other namespace
use round5::traits::KeyGen;
use rand_core::{CryptoRng, RngCore};

// Test RNG to regurgitate incremented values when 'asked'. Key generation draws sigma first and
// the secret seed second; only the secret seed differs between the two classes.
#[derive(Clone)]
#[repr(align(8))]
struct TestRng { calls: u32, secret: u8 }

impl RngCore for TestRng {
    fn next_u32(&mut self) -> u32 { unimplemented!() }

    fn next_u64(&mut self) -> u64 { unimplemented!() }

    fn fill_bytes(&mut self, _out: &mut [u8]) { unimplemented!() }

    fn try_fill_bytes(&mut self, out: &mut [u8]) -> Result<(), rand_core::Error> {
        let value = if self.calls % 2 == 0 { 0x33 } else { self.secret };
        out.iter_mut().for_each(|b| *b = value);
        out[0..4].copy_from_slice(&self.calls.to_be_bytes());
        self.calls = self.calls.wrapping_add(1);
        Ok(())
    }
}

impl CryptoRng for TestRng {}


fn keygen(runner: &mut CtRunner, mut _rng: &mut BenchRng) {
    const ITERATIONS_INNER: usize = 5;
    const ITERATIONS_OUTER: usize = 20_000;

    let mut classes = [Class::Right; ITERATIONS_OUTER];
    let mut rngs: Vec<TestRng> = (0..ITERATIONS_OUTER).map(|_| TestRng { calls: 0, secret: 12 }).collect();

    // Interleave left and right
    for i in (0..ITERATIONS_OUTER).step_by(2) {
        classes[i] = Class::Left;
        rngs[i] = TestRng { calls: 0, secret: 56 }; // <--- different secret seed
    }

    for (class, rng) in classes.into_iter().zip(rngs.into_iter()) {
        runner.run_one(class, || {
            let mut rng = rng.clone();
            for _ in 0..ITERATIONS_INNER {
                let _ = r5nd_1kem_5c::KG::try_keygen_with_rng(&mut rng).unwrap();
            }
        })
    }
}

ctbench_main!(keygen);
