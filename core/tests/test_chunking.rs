#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use proptest::prelude::*;

    use cryptstream_core::stream::chunking::{Chunker, PlaintextUnit};
    use cryptstream_core::stream::io::read_exact_or_eof;

    fn units(data: &[u8], unit_len: usize) -> Vec<PlaintextUnit> {
        Chunker::new(Cursor::new(data.to_vec()), unit_len)
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    /// Returns at most `step` bytes per call and `Interrupted` every other call.
    struct Stuttering {
        inner: Cursor<Vec<u8>>,
        step: usize,
        calls: usize,
    }

    impl Read for Stuttering {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
            }
            let n = buf.len().min(self.step);
            self.inner.read(&mut buf[..n])
        }
    }

    #[test]
    fn empty_input_yields_one_empty_unit() {
        let u = units(&[], 16);
        assert_eq!(u.len(), 1);
        assert_eq!(u[0].sequence_index, 0);
        assert!(u[0].is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_unit() {
        let u = units(&[7u8; 48], 16);
        assert_eq!(u.len(), 3);
        assert!(u.iter().all(|x| x.len() == 16));
    }

    #[test]
    fn short_last_unit() {
        let u = units(&[7u8; 50], 16);
        let lens: Vec<usize> = u.iter().map(PlaintextUnit::len).collect();
        assert_eq!(lens, vec![16, 16, 16, 2]);
        let idx: Vec<u64> = u.iter().map(|x| x.sequence_index).collect();
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn short_and_interrupted_reads_are_coalesced() {
        let data: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        let reader = Stuttering {
            inner: Cursor::new(data.clone()),
            step: 7,
            calls: 0,
        };
        let trickled: Vec<PlaintextUnit> = Chunker::new(reader, 100).collect::<io::Result<_>>().unwrap();
        assert_eq!(trickled, units(&data, 100));
    }

    #[test]
    fn rewind_replays_identical_units() {
        let data = vec![3u8; 70];
        let mut chunker = Chunker::new(Cursor::new(data), 32);
        let first: Vec<_> = chunker.by_ref().collect::<io::Result<_>>().unwrap();
        assert_eq!(chunker.units_emitted(), 3);

        chunker.rewind().unwrap();
        let second: Vec<_> = chunker.collect::<io::Result<_>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn read_error_is_yielded_once() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
        }

        let mut chunker = Chunker::new(Broken, 16);
        assert!(matches!(chunker.next(), Some(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe));
        assert!(chunker.next().is_none());
    }

    #[test]
    fn read_exact_or_eof_stops_at_eof() {
        let mut r = Cursor::new(vec![1u8; 10]);
        assert_eq!(read_exact_or_eof(&mut r, 4).unwrap().len(), 4);
        assert_eq!(read_exact_or_eof(&mut r, 8).unwrap().len(), 6);
        assert!(read_exact_or_eof(&mut r, 8).unwrap().is_empty());
    }

    #[test]
    fn read_exact_or_eof_coalesces_short_and_interrupted_reads() {
        let data: Vec<u8> = (0..100u8).collect();
        let mut r = Stuttering {
            inner: Cursor::new(data.clone()),
            step: 7,
            calls: 0,
        };
        assert_eq!(read_exact_or_eof(&mut r, 64).unwrap(), &data[..64]);
        assert_eq!(read_exact_or_eof(&mut r, 64).unwrap(), &data[64..]);
        // Stops at the limit without consuming the bytes after it.
        let mut r = Cursor::new(data.clone());
        read_exact_or_eof(&mut r, 30).unwrap();
        assert_eq!(r.position(), 30);
    }

    proptest! {
        #[test]
        fn units_reassemble_input(data in proptest::collection::vec(any::<u8>(), 0..2048), unit_len in 1usize..300) {
            let u = units(&data, unit_len);

            let joined: Vec<u8> = u.iter().flat_map(|x| x.bytes.iter().copied()).collect();
            prop_assert_eq!(&joined, &data);

            prop_assert!(u.iter().all(|x| x.len() <= unit_len));
            prop_assert!(u[..u.len() - 1].iter().all(|x| x.len() == unit_len));
            for (i, x) in u.iter().enumerate() {
                prop_assert_eq!(x.sequence_index, i as u64);
            }
            let expected = if data.is_empty() { 1 } else { data.len().div_ceil(unit_len) };
            prop_assert_eq!(u.len(), expected);
        }
    }
}
