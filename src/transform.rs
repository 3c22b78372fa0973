// Reference AES transform (RustCrypto `aes` + `cbc` + `ctr`).
//
// The output of a vector is the cipher run in the vector's direction over its
// input. CTR is its own inverse, so direction only matters for ECB and CBC.

use aes::{Aes128, Aes256};
use cipher::generic_array::GenericArray;
use cipher::{
    BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipher,
};

use crate::error::{Error, Result};
use crate::planner::{Direction, SecondaryMaterial};
use crate::variant::{KeySize, AES_BLOCK_SIZE, AES_CTR_SIZE, AES_NONCE_SIZE};

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type Aes128Ctr32 = ctr::Ctr32BE<Aes128>;
type Aes256Ctr32 = ctr::Ctr32BE<Aes256>;

/// Initial counter block `nonce || 00000000`.
pub fn counter_block(nonce: &[u8; AES_NONCE_SIZE]) -> [u8; AES_BLOCK_SIZE] {
    let mut block = [0u8; AES_BLOCK_SIZE];
    block[..AES_NONCE_SIZE].copy_from_slice(nonce);
    block[AES_NONCE_SIZE..].copy_from_slice(&0u32.to_be_bytes()[..AES_CTR_SIZE]);
    block
}

pub fn transform(
    key_size: KeySize,
    key: &[u8],
    secondary: &SecondaryMaterial,
    direction: Direction,
    input: &[u8],
) -> Result<Vec<u8>> {
    let mut buf = input.to_vec();

    match (secondary, key_size) {
        (SecondaryMaterial::None, KeySize::Aes128) => ecb::<Aes128>(key, direction, &mut buf)?,
        (SecondaryMaterial::None, KeySize::Aes256) => ecb::<Aes256>(key, direction, &mut buf)?,

        (SecondaryMaterial::Iv(iv), KeySize::Aes128) => match direction {
            Direction::Encrypt => cbc_encrypt::<cbc::Encryptor<Aes128>>(key, iv, &mut buf)?,
            Direction::Decrypt => cbc_decrypt::<cbc::Decryptor<Aes128>>(key, iv, &mut buf)?,
        },
        (SecondaryMaterial::Iv(iv), KeySize::Aes256) => match direction {
            Direction::Encrypt => cbc_encrypt::<cbc::Encryptor<Aes256>>(key, iv, &mut buf)?,
            Direction::Decrypt => cbc_decrypt::<cbc::Decryptor<Aes256>>(key, iv, &mut buf)?,
        },

        (SecondaryMaterial::CounterSeed(seed), KeySize::Aes128) => {
            keystream::<Aes128Ctr>(key, seed, &mut buf)?
        }
        (SecondaryMaterial::CounterSeed(seed), KeySize::Aes256) => {
            keystream::<Aes256Ctr>(key, seed, &mut buf)?
        }

        (SecondaryMaterial::Nonce(nonce), KeySize::Aes128) => {
            keystream::<Aes128Ctr32>(key, &counter_block(nonce), &mut buf)?
        }
        (SecondaryMaterial::Nonce(nonce), KeySize::Aes256) => {
            keystream::<Aes256Ctr32>(key, &counter_block(nonce), &mut buf)?
        }
    }

    Ok(buf)
}

fn check_blocks(data: &[u8]) -> Result<()> {
    if data.len() % AES_BLOCK_SIZE != 0 {
        return Err(Error::PartialBlock { len: data.len(), block: AES_BLOCK_SIZE });
    }
    Ok(())
}

fn ecb<C>(key: &[u8], direction: Direction, data: &mut [u8]) -> Result<()>
where
    C: KeyInit + BlockEncrypt + BlockDecrypt,
{
    check_blocks(data)?;
    let cipher = C::new_from_slice(key)?;
    for block in data.chunks_exact_mut(AES_BLOCK_SIZE) {
        let block = GenericArray::from_mut_slice(block);
        match direction {
            Direction::Encrypt => cipher.encrypt_block(block),
            Direction::Decrypt => cipher.decrypt_block(block),
        }
    }
    Ok(())
}

fn cbc_encrypt<E: KeyIvInit + BlockEncryptMut>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
    check_blocks(data)?;
    let mut cipher = E::new_from_slices(key, iv)?;
    for block in data.chunks_exact_mut(AES_BLOCK_SIZE) {
        cipher.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

fn cbc_decrypt<D: KeyIvInit + BlockDecryptMut>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
    check_blocks(data)?;
    let mut cipher = D::new_from_slices(key, iv)?;
    for block in data.chunks_exact_mut(AES_BLOCK_SIZE) {
        cipher.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

fn keystream<S: KeyIvInit + StreamCipher>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
    let mut cipher = S::new_from_slices(key, iv)?;
    cipher.apply_keystream(data);
    Ok(())
}
