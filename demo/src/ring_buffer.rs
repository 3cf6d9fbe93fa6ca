/// 定长环形缓冲区：写满后覆盖最旧的值
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    first: usize,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");
        Self {
            buffer: Vec::with_capacity(capacity),
            first: 0,
            capacity,
        }
    }

    pub fn add(&mut self, values: impl IntoIterator<Item = T>) {
        for value in values {
            self.push(value);
        }
    }

    /// 按从最旧值起的逻辑位置读取
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.buffer.len() {
            return None;
        }
        self.buffer.get((self.first + index) % self.capacity)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push(&mut self, value: T) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(value);
        } else {
            self.buffer[self.first] = value;
            self.first = (self.first + 1) % self.capacity;
        }
    }
}
