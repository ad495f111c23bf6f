// Copyright 2023 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#[cfg(test)]
mod ffi_tests {

    use std::ffi::CString;
    use std::ptr;
    use std::thread;

    use bbs_ffi::api::BlsKeyPair;
    use bbs_ffi::ffi::blind_commitment::*;
    use bbs_ffi::ffi::buffer::{ByteArray, ByteBuffer, FfiStr};
    use bbs_ffi::ffi::create_proof::*;
    use bbs_ffi::ffi::error::{codes, status, take_message, ExternError};
    use bbs_ffi::ffi::sign::*;
    use bbs_ffi::ffi::verify::*;
    use bbs_ffi::ffi::verify_proof::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn add_text(handle: u64, text: &str, err: &mut ExternError) -> i32 {
        let text = CString::new(text).unwrap();
        bbs_sign_context_add_message_string(handle, FfiStr::from_cstr(&text), err)
    }

    fn sign_two(key_pair: &BlsKeyPair, scheme_key: &[u8]) -> Vec<u8> {
        let mut err = ExternError::success();
        let handle = bbs_sign_context_init(&mut err);
        assert_eq!(status(&err), codes::SUCCESS);
        assert_eq!(add_text(handle, "first", &mut err), codes::SUCCESS);
        assert_eq!(add_text(handle, "second", &mut err), codes::SUCCESS);
        let sk = key_pair.secret_key.as_deref().unwrap();
        bbs_sign_context_set_secret_key(handle, ByteArray::from_slice(sk), &mut err);
        bbs_sign_context_set_public_key(handle, ByteArray::from_slice(scheme_key), &mut err);
        assert_eq!(status(&err), codes::SUCCESS);

        let mut signature = ByteBuffer::default();
        assert_eq!(bbs_sign_context_finish(handle, &mut signature, &mut err), codes::SUCCESS);
        signature.destroy_into_vec()
    }

    fn verify_two(scheme_key: &[u8], signature: &[u8], second: &str) -> i32 {
        let mut err = ExternError::success();
        let handle = bbs_verify_context_init(&mut err);
        for text in ["first", second] {
            let text = CString::new(text).unwrap();
            bbs_verify_context_add_message_string(handle, FfiStr::from_cstr(&text), &mut err);
        }
        bbs_verify_context_set_public_key(handle, ByteArray::from_slice(scheme_key), &mut err);
        bbs_verify_context_set_signature(handle, ByteArray::from_slice(signature), &mut err);
        assert_eq!(status(&err), codes::SUCCESS);
        let verify_status = bbs_verify_context_finish(handle, &mut err);
        assert_eq!(status(&err), codes::SUCCESS, "{:?}", take_message(&mut err));
        verify_status
    }

    #[test]
    fn verify_reports_valid_and_invalid() {
        init();
        let key_pair = BlsKeyPair::generate_g2(Some(b"ffi verify")).unwrap();
        let scheme_key = key_pair.bbs_key(2).unwrap().public_key;
        let signature = sign_two(&key_pair, &scheme_key);
        assert_eq!(signature.len(), bbs_signature_size() as usize);

        assert_eq!(verify_two(&scheme_key, &signature, "second"), SIGNATURE_VALID);
        assert_eq!(verify_two(&scheme_key, &signature, "changed"), SIGNATURE_INVALID);
    }

    #[test]
    fn finished_handle_is_stale() {
        init();
        let mut err = ExternError::success();
        let handle = bbs_sign_context_init(&mut err);
        assert_eq!(add_text(handle, "only", &mut err), codes::SUCCESS);

        // the secret key is missing, the handle is retired anyway
        let mut signature = ByteBuffer::default();
        assert_eq!(bbs_sign_context_finish(handle, &mut signature, &mut err), codes::ENGINE);
        assert_eq!(take_message(&mut err).as_deref(), Some("Secret Key must be set"));
        assert!(signature.as_slice().is_empty());

        assert_eq!(add_text(handle, "late", &mut err), codes::INVALID_HANDLE);
        assert_eq!(bbs_sign_context_finish(handle, &mut signature, &mut err), codes::INVALID_HANDLE);
        let _ = take_message(&mut err);

        let next = bbs_sign_context_init(&mut err);
        assert_ne!(next, handle, "handles are never reused");
        assert_eq!(free_bbs_sign(next, &mut err), codes::SUCCESS);
    }

    #[test]
    fn free_retires_the_handle() {
        init();
        let mut err = ExternError::success();
        let handle = bbs_verify_proof_context_init(&mut err);
        assert_eq!(free_verify_proof(handle, &mut err), codes::SUCCESS);
        assert_eq!(free_verify_proof(handle, &mut err), codes::INVALID_HANDLE);
        assert_eq!(bbs_verify_proof_context_finish(handle, &mut err), 0);
        assert_eq!(status(&err), codes::INVALID_HANDLE);
        let _ = take_message(&mut err);
    }

    #[test]
    fn handles_are_bound_to_their_family() {
        init();
        let mut err = ExternError::success();
        let sign_handle = bbs_sign_context_init(&mut err);

        let text = CString::new("message").unwrap();
        let code = bbs_verify_context_add_message_string(sign_handle, FfiStr::from_cstr(&text), &mut err);
        assert_eq!(code, codes::INVALID_HANDLE);
        let _ = take_message(&mut err);

        assert_eq!(free_bbs_verify(sign_handle, &mut err), codes::INVALID_HANDLE);
        let _ = take_message(&mut err);
        // still usable by its own family
        assert_eq!(add_text(sign_handle, "message", &mut err), codes::SUCCESS);
        assert_eq!(free_bbs_sign(sign_handle, &mut err), codes::SUCCESS);
        assert_eq!(add_text(0, "message", &mut err), codes::INVALID_HANDLE);
        let _ = take_message(&mut err);
    }

    #[test]
    fn empty_message_is_rejected() {
        init();
        let mut err = ExternError::success();
        let handle = bbs_sign_context_init(&mut err);

        let code = bbs_sign_context_add_message_bytes(handle, ByteArray::from_slice(&[]), &mut err);
        assert_eq!(code, codes::ENGINE);
        assert_eq!(take_message(&mut err).as_deref(), Some("Message cannot be empty"));

        let code = bbs_sign_context_add_message_string(handle, unsafe { FfiStr::from_raw(ptr::null()) }, &mut err);
        assert_eq!(code, codes::ENGINE);
        assert_eq!(take_message(&mut err).as_deref(), Some("Message must be set"));

        assert_eq!(free_bbs_sign(handle, &mut err), codes::SUCCESS);
    }

    #[test]
    fn absent_and_empty_nonces_differ() {
        init();
        let mut err = ExternError::success();
        let handle = bbs_blind_commitment_context_init(&mut err);

        let code = bbs_blind_commitment_context_set_nonce_bytes(handle, ByteArray::absent(), &mut err);
        assert_eq!(code, codes::ENGINE);
        assert_eq!(take_message(&mut err).as_deref(), Some("Nonce must be set"));

        let code = bbs_blind_commitment_context_set_nonce_bytes(handle, ByteArray::from_slice(&[]), &mut err);
        assert_eq!(code, codes::SUCCESS);

        let empty = CString::new("").unwrap();
        let code = bbs_blind_commitment_context_set_nonce_string(handle, FfiStr::from_cstr(&empty), &mut err);
        assert_eq!(code, codes::SUCCESS);

        assert_eq!(free_bbs_blind_commitment(handle, &mut err), codes::SUCCESS);
    }

    #[test]
    fn proof_round_trip_through_handles() {
        init();
        let key_pair = BlsKeyPair::generate_g2(Some(b"ffi proof")).unwrap();
        let scheme_key = key_pair.bbs_key(2).unwrap().public_key;
        let signature = sign_two(&key_pair, &scheme_key);

        let mut err = ExternError::success();
        let handle = bbs_create_proof_context_init(&mut err);
        for (text, xtype) in [
            ("first", ProofMessageType::Revealed),
            ("second", ProofMessageType::HiddenProofSpecificBlinding),
        ] {
            let text = CString::new(text).unwrap();
            bbs_create_proof_context_add_proof_message_string(
                handle,
                FfiStr::from_cstr(&text),
                xtype as u32,
                ByteArray::absent(),
                &mut err,
            );
            assert_eq!(status(&err), codes::SUCCESS);
        }
        bbs_create_proof_context_set_signature(handle, ByteArray::from_slice(&signature), &mut err);
        bbs_create_proof_context_set_public_key(handle, ByteArray::from_slice(&scheme_key), &mut err);
        bbs_create_proof_context_set_nonce_bytes(handle, ByteArray::from_slice(b"nonce"), &mut err);
        assert_eq!(status(&err), codes::SUCCESS);

        let expected = bbs_create_proof_context_size(handle);
        let mut proof = ByteBuffer::default();
        assert_eq!(bbs_create_proof_context_finish(handle, &mut proof, &mut err), codes::SUCCESS);
        let proof = proof.destroy_into_vec();
        assert_eq!(proof.len(), expected as usize);
        assert_eq!(bbs_create_proof_context_size(handle), -1);
        assert_eq!(bbs_get_total_messages_count_for_proof(ByteArray::from_slice(&proof)), 2);
        assert_eq!(bbs_get_total_messages_count_for_proof(ByteArray::absent()), -1);

        let handle = bbs_verify_proof_context_init(&mut err);
        let text = CString::new("first").unwrap();
        bbs_verify_proof_context_add_message_string(handle, FfiStr::from_cstr(&text), &mut err);
        bbs_verify_proof_context_set_proof(handle, ByteArray::from_slice(&proof), &mut err);
        bbs_verify_proof_context_set_public_key(handle, ByteArray::from_slice(&scheme_key), &mut err);
        bbs_verify_proof_context_set_nonce_bytes(handle, ByteArray::from_slice(b"nonce"), &mut err);
        assert_eq!(status(&err), codes::SUCCESS);
        assert_eq!(bbs_verify_proof_context_finish(handle, &mut err), 200);
        assert_eq!(status(&err), codes::SUCCESS);
    }

    #[test]
    fn unknown_proof_message_type_is_rejected() {
        init();
        let mut err = ExternError::success();
        let handle = bbs_create_proof_context_init(&mut err);
        let text = CString::new("message").unwrap();
        let code = bbs_create_proof_context_add_proof_message_string(
            handle,
            FfiStr::from_cstr(&text),
            7,
            ByteArray::absent(),
            &mut err,
        );
        assert_eq!(code, codes::ENGINE);
        let _ = take_message(&mut err);
        assert_eq!(free_create_proof(handle, &mut err), codes::SUCCESS);
    }

    #[test]
    fn blinding_factor_absent_and_empty_differ() {
        init();
        let mut err = ExternError::success();
        let handle = bbs_create_proof_context_init(&mut err);
        let text = CString::new("message").unwrap();
        let xtype = ProofMessageType::HiddenExternalBlinding as u32;

        let code = bbs_create_proof_context_add_proof_message_string(
            handle,
            FfiStr::from_cstr(&text),
            xtype,
            ByteArray::absent(),
            &mut err,
        );
        assert_eq!(code, codes::ENGINE);
        assert_eq!(take_message(&mut err).as_deref(), Some("Blinding Factor must be set"));

        let code = bbs_create_proof_context_add_proof_message_string(
            handle,
            FfiStr::from_cstr(&text),
            xtype,
            ByteArray::from_slice(&[]),
            &mut err,
        );
        assert_eq!(code, codes::ENGINE);
        assert_eq!(take_message(&mut err).as_deref(), Some("Blinding Factor cannot be empty"));

        let code = bbs_create_proof_context_add_proof_message_string(
            handle,
            FfiStr::from_cstr(&text),
            xtype,
            ByteArray::from_slice(b"shared blinding"),
            &mut err,
        );
        assert_eq!(code, codes::SUCCESS);
        assert_eq!(free_create_proof(handle, &mut err), codes::SUCCESS);
    }

    #[test]
    fn threads_sign_and_verify_on_their_own_handles() {
        init();
        let workers: Vec<_> = (0..8u8)
            .map(|i| {
                thread::spawn(move || {
                    let seed = [b"ffi thread ".as_slice(), &[i]].concat();
                    let key_pair = BlsKeyPair::generate_g2(Some(&seed)).unwrap();
                    let scheme_key = key_pair.bbs_key(2).unwrap().public_key;
                    for _ in 0..4 {
                        let signature = sign_two(&key_pair, &scheme_key);
                        assert_eq!(signature.len(), bbs_signature_size() as usize);
                        assert_eq!(verify_two(&scheme_key, &signature, "second"), SIGNATURE_VALID);
                        assert_eq!(verify_two(&scheme_key, &signature, "other"), SIGNATURE_INVALID);
                    }
                    scheme_key
                })
            })
            .collect();

        let keys: Vec<Vec<u8>> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        for (i, key) in keys.iter().enumerate() {
            assert!(keys[i + 1..].iter().all(|other| other != key));
        }
    }
}
