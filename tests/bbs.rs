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
mod bbs_tests {

    use bbs_ffi::api::{
        blind_sign, create_blinded_commitment, create_proof, sign, total_message_count, unblind_signature,
        verify, verify_blinded_commitment, verify_proof, BbsKey, BlindSignRequest, BlsKeyPair,
        CreateBlindedCommitmentRequest, CreateProofRequest, IndexedMessage, Message, ProofMessage,
        ProofMessageType, SignRequest, SignatureProofStatus, UnblindSignatureRequest,
        VerifyBlindedCommitmentRequest, VerifyProofRequest, VerifyRequest,
    };
    use bbs_ffi::errors::Error;
    use bbs_ffi::ffi::blind_sign::{bbs_blind_signature_size, bbs_blinding_factor_size};
    use bbs_ffi::ffi::bls::{
        blinding_factor_size, bls_public_key_g1_size, bls_public_key_g2_size, bls_secret_key_size,
    };
    use bbs_ffi::ffi::sign::bbs_signature_size;

    const MESSAGES: [&str; 5] = ["message 1", "message 2", "message 3", "message 4", "message 5"];

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn messages() -> Vec<Message> {
        MESSAGES.iter().map(|m| Message::from(*m)).collect()
    }

    fn signed(seed: &[u8]) -> (BlsKeyPair, Vec<u8>) {
        let key_pair = BlsKeyPair::generate_g2(Some(seed)).unwrap();
        let signature = sign(&SignRequest {
            key_pair: key_pair.clone(),
            messages: messages(),
        })
        .unwrap();
        (key_pair, signature)
    }

    fn verifies(key_pair: &BlsKeyPair, signature: &[u8], messages: Vec<Message>) -> bool {
        // a malformed request counts as a failed verification
        verify(&VerifyRequest {
            key_pair: key_pair.clone(),
            signature: signature.to_vec(),
            messages,
        })
        .unwrap_or(false)
    }

    fn reveal_even(key_pair: &BlsKeyPair, signature: &[u8], nonce: &str) -> Vec<u8> {
        let proof_messages = MESSAGES
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let kind = if i % 2 == 0 {
                    ProofMessageType::Revealed
                } else {
                    ProofMessageType::HiddenProofSpecificBlinding
                };
                ProofMessage::new(*m, kind)
            })
            .collect();
        let request = CreateProofRequest::new(
            key_pair.bbs_key(5).unwrap(),
            proof_messages,
            signature.to_vec(),
            None,
            nonce.into(),
        )
        .unwrap();
        create_proof(&request).unwrap()
    }

    fn check_proof(public_key: BbsKey, proof: &[u8], revealed: &[&str], nonce: &str) -> SignatureProofStatus {
        verify_proof(&VerifyProofRequest {
            public_key,
            proof: proof.to_vec(),
            messages: revealed.iter().map(|m| Message::from(*m)).collect(),
            nonce: nonce.into(),
        })
        .unwrap()
    }

    //KEYS

    #[test]
    fn seeded_key_generation_is_deterministic() {
        init();
        let a = BlsKeyPair::generate_g2(Some(b"deterministic seed")).unwrap();
        let b = BlsKeyPair::generate_g2(Some(b"deterministic seed")).unwrap();
        assert_eq!(a, b, "same seed must give the same key pair");

        let c = BlsKeyPair::generate_g2(Some(b"another seed")).unwrap();
        assert_ne!(a.public_key, c.public_key);

        let g1 = BlsKeyPair::generate_g1(Some(b"deterministic seed")).unwrap();
        assert_eq!(g1, BlsKeyPair::generate_g1(Some(b"deterministic seed")).unwrap());
        assert_eq!(g1.secret_key, a.secret_key);

        let random_1 = BlsKeyPair::generate_g2(None).unwrap();
        let random_2 = BlsKeyPair::generate_g2(None).unwrap();
        assert_ne!(random_1.secret_key, random_2.secret_key);
    }

    #[test]
    fn key_sizes() {
        init();
        for _ in 0..2 {
            assert_eq!(bls_secret_key_size(), 32);
            assert_eq!(bls_public_key_g1_size(), 48);
            assert_eq!(bls_public_key_g2_size(), 96);
            assert_eq!(bbs_signature_size(), 112);
            assert_eq!(bbs_blind_signature_size(), 112);
            assert_eq!(blinding_factor_size(), 32);
            assert_eq!(bbs_blinding_factor_size(), 32);
        }

        let g1 = BlsKeyPair::generate_g1(None).unwrap();
        assert!(g1.is_g1() && !g1.is_g2());
        let g2 = BlsKeyPair::generate_blinded_g2(None).unwrap();
        assert!(g2.is_g2() && !g2.is_g1());
        assert_eq!(g2.blinding_factor.as_ref().map(Vec::len), Some(32));
        let blinded_g1 = BlsKeyPair::generate_blinded_g1(None).unwrap();
        assert!(blinded_g1.is_g1());
    }

    #[test]
    fn g1_public_key_cannot_derive_scheme_key() {
        init();
        let g1 = BlsKeyPair::generate_g1(None).unwrap();
        let public_only = BlsKeyPair::from_public_key(g1.public_key);
        assert_eq!(public_only.bbs_key(5).unwrap_err(), Error::G1KeyDerivation);
    }

    //SIGN / VERIFY

    #[test]
    fn sign_and_verify() {
        init();
        let (key_pair, signature) = signed(b"sign and verify");
        assert_eq!(signature.len(), 112);
        assert!(verifies(&key_pair, &signature, messages()), "Signature NOT VALID!");

        let public_only = BlsKeyPair::from_public_key(key_pair.public_key.clone());
        assert!(verifies(&public_only, &signature, messages()));
    }

    #[test]
    fn tampered_inputs_fail_verification() {
        init();
        let (key_pair, signature) = signed(b"tampering");

        let mut changed = messages();
        changed[2] = Message::from("message 33");
        assert!(!verifies(&key_pair, &signature, changed), "changed message MUST fail");

        let mut reordered = messages();
        reordered.swap(0, 1);
        assert!(!verifies(&key_pair, &signature, reordered), "reordered messages MUST fail");

        let other = BlsKeyPair::generate_g2(Some(b"someone else")).unwrap();
        assert!(!verifies(&other, &signature, messages()), "wrong key MUST fail");

        let truncated = messages()[..4].to_vec();
        assert!(!verifies(&key_pair, &signature, truncated), "truncated list MUST fail");
    }

    #[test]
    fn sign_requires_a_secret_key() {
        init();
        let key_pair = BlsKeyPair::generate_g2(None).unwrap();
        let request = SignRequest {
            key_pair: BlsKeyPair::from_public_key(key_pair.public_key),
            messages: messages(),
        };
        assert_eq!(sign(&request).unwrap_err(), Error::MissingSecretKey);
    }

    #[test]
    fn engine_errors_carry_the_message() {
        init();
        let (key_pair, _) = signed(b"engine errors");
        let err = verify(&VerifyRequest {
            key_pair,
            signature: vec![1, 2, 3],
            messages: messages(),
        })
        .unwrap_err();
        match err {
            Error::Engine { code, message } => {
                assert_eq!(code, 1);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    //PROOFS

    #[test]
    fn selective_disclosure_scenario() {
        init();
        let (key_pair, signature) = signed(b"selective disclosure");
        assert!(verifies(&key_pair, &signature, messages()));

        let proof = reveal_even(&key_pair, &signature, "verifier nonce");
        assert_eq!(total_message_count(&proof).unwrap(), 5);

        let public_key = key_pair.bbs_key(5).unwrap();
        let status = check_proof(
            public_key.clone(),
            &proof,
            &["message 1", "message 3", "message 5"],
            "verifier nonce",
        );
        assert_eq!(status, SignatureProofStatus::Success);

        let status = check_proof(
            public_key,
            &proof,
            &["message 1", "message 3", "message 6"],
            "verifier nonce",
        );
        assert_eq!(status, SignatureProofStatus::BadRevealedMessage);
    }

    #[test]
    fn proof_with_wrong_nonce_or_key() {
        init();
        let (key_pair, signature) = signed(b"wrong nonce");
        let proof = reveal_even(&key_pair, &signature, "nonce A");
        let revealed = ["message 1", "message 3", "message 5"];

        let status = check_proof(key_pair.bbs_key(5).unwrap(), &proof, &revealed, "nonce B");
        assert!(!status.is_success());
        assert_eq!(status, SignatureProofStatus::BadHiddenMessage);

        let other = BlsKeyPair::generate_g2(Some(b"other signer")).unwrap();
        let status = check_proof(other.bbs_key(5).unwrap(), &proof, &revealed, "nonce A");
        assert_eq!(status, SignatureProofStatus::BadSignature);
    }

    #[test]
    fn external_blinding_without_factor_is_rejected_up_front() {
        init();
        let (key_pair, signature) = signed(b"precondition");
        let messages = vec![ProofMessage::new("message 1", ProofMessageType::HiddenExternalBlinding)];
        let err = CreateProofRequest::new(
            key_pair.bbs_key(5).unwrap(),
            messages,
            signature,
            None,
            "nonce".into(),
        )
        .unwrap_err();
        assert_eq!(err, Error::MissingBlindingFactor);
    }

    #[test]
    fn external_blinding_proof_verifies() {
        init();
        let (key_pair, signature) = signed(b"external blinding");
        let proof_messages = MESSAGES
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let kind = if i == 0 {
                    ProofMessageType::HiddenExternalBlinding
                } else {
                    ProofMessageType::Revealed
                };
                ProofMessage::new(*m, kind)
            })
            .collect();
        let request = CreateProofRequest::new(
            key_pair.bbs_key(5).unwrap(),
            proof_messages,
            signature,
            Some(b"shared blinding".to_vec()),
            "nonce".into(),
        )
        .unwrap();
        let proof = create_proof(&request).unwrap();

        let status = check_proof(key_pair.bbs_key(5).unwrap(), &proof, &MESSAGES[1..], "nonce");
        assert_eq!(status, SignatureProofStatus::Success);
    }

    //BLIND ISSUANCE

    #[test]
    fn blind_issuance_round_trip() {
        init();
        let issuer = BlsKeyPair::generate_g2(Some(b"issuer")).unwrap();
        let public_key = issuer.bbs_key(5).unwrap();

        let committed = vec![IndexedMessage::new(1, "message 2"), IndexedMessage::new(3, "message 4")];
        let commitment = create_blinded_commitment(&CreateBlindedCommitmentRequest {
            public_key: public_key.clone(),
            messages: committed,
            nonce: "issuance nonce".into(),
        })
        .unwrap();
        assert_eq!(commitment.commitment.len(), 48);
        assert_eq!(commitment.blinding_factor.len(), 32);

        let status = verify_blinded_commitment(&VerifyBlindedCommitmentRequest {
            public_key: public_key.clone(),
            proof: commitment.blind_sign_context.clone(),
            blinded_indices: vec![1, 3],
            nonce: "issuance nonce".into(),
        })
        .unwrap();
        assert_eq!(status, SignatureProofStatus::Success);

        let status = verify_blinded_commitment(&VerifyBlindedCommitmentRequest {
            public_key: public_key.clone(),
            proof: commitment.blind_sign_context.clone(),
            blinded_indices: vec![1, 3],
            nonce: "replayed nonce".into(),
        })
        .unwrap();
        assert_eq!(status, SignatureProofStatus::BadHiddenMessage);

        let known = vec![
            IndexedMessage::new(0, "message 1"),
            IndexedMessage::new(2, "message 3"),
            IndexedMessage::new(4, "message 5"),
        ];
        let blinded_signature = blind_sign(&BlindSignRequest {
            key_pair: issuer.clone(),
            public_key,
            commitment: commitment.commitment.clone(),
            messages: known,
        })
        .unwrap();
        assert_eq!(blinded_signature.len(), 112);

        let signature = unblind_signature(&UnblindSignatureRequest {
            blinded_signature: blinded_signature.clone(),
            blinding_factor: commitment.blinding_factor.clone(),
        })
        .unwrap();
        assert!(verifies(&issuer, &signature, messages()), "Unblinded Signature NOT VALID!");
        assert!(!verifies(&issuer, &blinded_signature, messages()), "blinded signature MUST be INVALID!");
    }

    #[test]
    fn blind_sign_requires_a_secret_key() {
        init();
        let issuer = BlsKeyPair::generate_g2(None).unwrap();
        let request = BlindSignRequest {
            public_key: issuer.bbs_key(2).unwrap(),
            key_pair: BlsKeyPair::from_public_key(issuer.public_key),
            commitment: vec![0; 48],
            messages: vec![IndexedMessage::new(0, "m")],
        };
        assert_eq!(blind_sign(&request).unwrap_err(), Error::MissingSecretKey);
    }
}
