pub(crate) fn align_up(size: usize, alignment: usize) -> usize {
    size.div_ceil(alignment) * alignment
}
