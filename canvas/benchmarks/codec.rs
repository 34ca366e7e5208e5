//! Benchmarks decoding and encoding of grayscale images.
use brunch::Bench;

use imageproc_canvas::{encode_to_vec, Decoder, EncodeOptions, Error};
use imageproc_texel::{Complex, Pixel, PixelBuffer};

#[derive(Clone, Copy, Debug)]
enum Samples {
    Scalar,
    Complex,
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Decode,
    Encode,
}

struct Codec {
    samples: Samples,
    direction: Direction,
    sz: usize,
}

impl Codec {
    fn name(&self) -> String {
        format!("{:?}({:?}, {})", self.direction, self.samples, self.sz)
    }

    fn prepare(self) -> Result<Box<dyn FnMut()>, Error> {
        match self.samples {
            Samples::Scalar => self.prepare_for::<i32>(),
            Samples::Complex => self.prepare_for::<Complex>(),
        }
    }

    fn prepare_for<P: Pixel + 'static>(&self) -> Result<Box<dyn FnMut()>, Error> {
        let mut image = PixelBuffer::<P>::with_width_and_height(self.sz, self.sz)?;
        for (idx, pixel) in image.as_mut_slice().iter_mut().enumerate() {
            *pixel = P::from_byte(idx as u8);
        }

        let options = EncodeOptions::default();
        let stream = encode_to_vec(&image, &options)?;

        Ok(match self.direction {
            Direction::Decode => Box::new(move || {
                let _: PixelBuffer<P> = Decoder::new(&stream[..]).decode().unwrap();
            }),
            Direction::Encode => Box::new(move || {
                encode_to_vec(&image, &options).unwrap();
            }),
        })
    }
}

fn main() {
    let mut tests = vec![];
    for sz in [64, 512] {
        for samples in [Samples::Scalar, Samples::Complex] {
            for direction in [Direction::Decode, Direction::Encode] {
                tests.push(Codec {
                    samples,
                    direction,
                    sz,
                });
            }
        }
    }

    let mut benches = brunch::Benches::default();
    benches.extend(tests.into_iter().map(|codec| {
        Bench::new(format!("canvas::codec::{}", codec.name()))
            .run(codec.prepare().expect("Failed to setup benchmark"))
    }));
    benches.finish();
}
