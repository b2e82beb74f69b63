//! OT test utilities.

/// Asserts the correctness of chosen-message oblivious transfer.
pub fn assert_ot<T: PartialEq>(choices: &[bool], msgs: &[[T; 2]], received: &[T]) {
    assert_eq!(choices.len(), msgs.len());
    assert_eq!(choices.len(), received.len());
    assert!(choices.iter().zip(msgs.iter().zip(received)).all(
        |(&choice, ([zero, one], received))| {
            if choice {
                received == one
            } else {
                received == zero
            }
        }
    ));
}
