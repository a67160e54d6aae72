pub mod buffer;
pub mod general;
pub mod geometry;

#[cfg(test)]
mod buffer_tests {
    use crate::buffer::RingBuffer;
    use approx::assert_ulps_eq;

    #[test]
    fn test_ringbuffer_avg_empty() {
        let x: RingBuffer<i32> = RingBuffer::new(5);
        assert!(x.get_avg().is_none());
    }
    #[test]
    fn test_ringbuffer_avg_overwrites_oldest() {
        let mut x: RingBuffer<i32> = RingBuffer::new(5);
        for val in [3, 4, 2, 1, 5, 10] {
            x.push(val);
        }
        assert_ulps_eq!(x.get_avg().unwrap(), 4.4);
    }
    #[test]
    fn test_ringbuffer_iter_order() {
        let mut x: RingBuffer<u32> = RingBuffer::new(3);
        for val in 1..=5 {
            x.push(val);
        }
        let vals: Vec<u32> = x.iter().copied().collect();
        assert_eq!(vals, vec![3, 4, 5]);
    }
    #[test]
    fn test_ringbuffer_retain() {
        let mut x: RingBuffer<u32> = RingBuffer::new(4);
        for val in 1..=6 {
            x.push(val);
        }
        x.retain(|&val| val % 2 == 0);
        assert_eq!(x.iter().copied().collect::<Vec<u32>>(), vec![4, 6]);

        // buffer keeps its capacity after retaining
        x.push(7);
        x.push(8);
        x.push(9);
        assert_eq!(x.iter().copied().collect::<Vec<u32>>(), vec![6, 7, 8, 9]);
    }
    #[test]
    fn test_ringbuffer_iter_mut_and_clear() {
        let mut x: RingBuffer<f64> = RingBuffer::new(2);
        x.push(1.0);
        x.push(2.0);
        x.push(3.0);
        for val in x.iter_mut() {
            *val *= 2.0;
        }
        assert_ulps_eq!(x.get_avg().unwrap(), 5.0);
        x.clear();
        assert!(x.is_empty());
    }
}
